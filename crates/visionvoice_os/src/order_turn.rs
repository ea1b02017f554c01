#![forbid(unsafe_code)]

use unicode_normalization::UnicodeNormalization;

use visionvoice_engines::order_intent::{OrderIntentConfig, OrderIntentRuntime};
use visionvoice_engines::order_reply::{
    OrderReplyConfig, OrderReplyRuntime, REPEAT_REQUEST_TEXT,
};
use visionvoice_engines::order_token::{OrderTokenConfig, OrderTokenRuntime};
use visionvoice_kernel_contracts::morph::{MorphTokenizer, RawToken};
use visionvoice_kernel_contracts::order::{
    CartDelta, OrderIntentRequest, OrderRequestEnvelope, SpokenMessage, SpokenMessageKind,
    SpokenReplyRequest, TokenClassifyRequest, ORDER_CONTRACT_VERSION,
};
use visionvoice_kernel_contracts::{ContractViolation, ReasonCodeId, TurnId};

pub mod reason_codes {
    use visionvoice_kernel_contracts::ReasonCodeId;

    // VV.TURN reason-code namespace.
    pub const VO_OK_TURN: ReasonCodeId = ReasonCodeId(0x564F_0001);

    pub const VO_FALLBACK_EMPTY_TRANSCRIPT: ReasonCodeId = ReasonCodeId(0x564F_00F1);
    pub const VO_FALLBACK_TRANSCRIPT_TOO_LONG: ReasonCodeId = ReasonCodeId(0x564F_00F2);
    pub const VO_FALLBACK_TOKENIZE_FAILED: ReasonCodeId = ReasonCodeId(0x564F_00F3);
    pub const VO_FALLBACK_PIPELINE_ERROR: ReasonCodeId = ReasonCodeId(0x564F_00F4);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTurnConfig {
    pub max_transcript_len: usize,
    pub max_tokens: u16,
    pub token: OrderTokenConfig,
    pub intent: OrderIntentConfig,
    pub reply: OrderReplyConfig,
}

impl OrderTurnConfig {
    pub fn default_ko_v1() -> Self {
        Self {
            max_transcript_len: 4096,
            max_tokens: 256,
            token: OrderTokenConfig::default_ko_v1(),
            intent: OrderIntentConfig::default_ko_v1(),
            reply: OrderReplyConfig::default_ko_v1(),
        }
    }
}

/// What one voice turn hands back to the UI: deltas to fold into the
/// caller-owned cart, the spoken reply, and the turn-level reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTurnOutcome {
    pub deltas: Vec<CartDelta>,
    pub messages: Vec<SpokenMessage>,
    pub reason_code: ReasonCodeId,
}

/// One voice turn: transcript → external tokenizer → classify → scan →
/// reply. Every failure mode inside the chain degrades to the
/// repeat-request fallback; nothing panics and nothing propagates past
/// this boundary.
#[derive(Debug, Clone)]
pub struct OrderTurnRuntime {
    config: OrderTurnConfig,
    token_rt: OrderTokenRuntime,
    intent_rt: OrderIntentRuntime,
    reply_rt: OrderReplyRuntime,
}

impl OrderTurnRuntime {
    pub fn new(config: OrderTurnConfig) -> Self {
        Self {
            config,
            token_rt: OrderTokenRuntime::new(config.token),
            intent_rt: OrderIntentRuntime::new(config.intent),
            reply_rt: OrderReplyRuntime::new(config.reply),
        }
    }

    pub fn run_turn(
        &self,
        tokenizer: &dyn MorphTokenizer,
        turn_id: TurnId,
        transcript: &str,
    ) -> OrderTurnOutcome {
        let trimmed = transcript.trim();
        if trimmed.is_empty() {
            return self.fallback(reason_codes::VO_FALLBACK_EMPTY_TRANSCRIPT);
        }
        if trimmed.len() > self.config.max_transcript_len {
            return self.fallback(reason_codes::VO_FALLBACK_TRANSCRIPT_TOO_LONG);
        }

        // Transcripts arrive NFD from some capture stacks; every lexicon
        // and keyword comparison assumes NFC.
        let transcript: String = trimmed.nfc().collect();
        let raw_tokens = match tokenizer.tokenize(&transcript) {
            Ok(tokens) => tokens,
            Err(_) => return self.fallback(reason_codes::VO_FALLBACK_TOKENIZE_FAILED),
        };

        match self.run_pipeline(turn_id, raw_tokens) {
            Ok(outcome) => outcome,
            Err(_) => self.fallback(reason_codes::VO_FALLBACK_PIPELINE_ERROR),
        }
    }

    fn run_pipeline(
        &self,
        turn_id: TurnId,
        raw_tokens: Vec<RawToken>,
    ) -> Result<OrderTurnOutcome, ContractViolation> {
        let mut normalized = Vec::with_capacity(raw_tokens.len());
        for token in raw_tokens {
            normalized.push(RawToken::v1(
                token.surface.nfc().collect(),
                token.lemma.nfc().collect(),
                token.pos_tag,
            )?);
        }

        let envelope = OrderRequestEnvelope::v1(turn_id, self.config.max_tokens)?;
        let classified = self
            .token_rt
            .run(&TokenClassifyRequest::v1(envelope.clone(), normalized)?)?;
        let intent = self
            .intent_rt
            .run(&OrderIntentRequest::v1(envelope.clone(), classified.tokens)?)?;
        let reply = self.reply_rt.run(&SpokenReplyRequest::v1(
            envelope,
            intent.deltas.clone(),
            intent.view,
        )?)?;

        Ok(OrderTurnOutcome {
            deltas: intent.deltas,
            messages: reply.messages,
            reason_code: reason_codes::VO_OK_TURN,
        })
    }

    fn fallback(&self, reason_code: ReasonCodeId) -> OrderTurnOutcome {
        OrderTurnOutcome {
            deltas: vec![],
            messages: vec![SpokenMessage {
                schema_version: ORDER_CONTRACT_VERSION,
                kind: SpokenMessageKind::RepeatRequest,
                text: REPEAT_REQUEST_TEXT.to_string(),
            }],
            reason_code,
        }
    }
}
