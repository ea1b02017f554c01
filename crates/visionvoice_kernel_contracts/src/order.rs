#![forbid(unsafe_code)]

use crate::morph::RawToken;
use crate::{ContractViolation, ReasonCodeId, SchemaVersion, TurnId, Validate};

pub const ORDER_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Number,
    Noun,
}

/// A raw token after lexicon resolution: number words become the decimal
/// string of their resolved value, everything else keeps lemma-else-surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedToken {
    pub schema_version: SchemaVersion,
    pub text: String,
    pub category: TokenCategory,
}

impl ClassifiedToken {
    pub fn v1(text: String, category: TokenCategory) -> Result<Self, ContractViolation> {
        let token = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            text,
            category,
        };
        token.validate()?;
        Ok(token)
    }
}

impl Validate for ClassifiedToken {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "classified_token.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        match self.category {
            TokenCategory::Number => {
                validate_quantity_text("classified_token.text", &self.text)
            }
            TokenCategory::Noun => validate_text("classified_token.text", &self.text, 96),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequestEnvelope {
    pub schema_version: SchemaVersion,
    pub turn_id: TurnId,
    pub max_tokens: u16,
}

impl OrderRequestEnvelope {
    pub fn v1(turn_id: TurnId, max_tokens: u16) -> Result<Self, ContractViolation> {
        let env = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            turn_id,
            max_tokens,
        };
        env.validate()?;
        Ok(env)
    }
}

impl Validate for OrderRequestEnvelope {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "order_request_envelope.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        self.turn_id.validate()?;
        if self.max_tokens == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "order_request_envelope.max_tokens",
                reason: "must be > 0",
            });
        }
        if self.max_tokens > 512 {
            return Err(ContractViolation::InvalidValue {
                field: "order_request_envelope.max_tokens",
                reason: "must be <= 512",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClassifyRequest {
    pub schema_version: SchemaVersion,
    pub envelope: OrderRequestEnvelope,
    pub raw_tokens: Vec<RawToken>,
}

impl TokenClassifyRequest {
    pub fn v1(
        envelope: OrderRequestEnvelope,
        raw_tokens: Vec<RawToken>,
    ) -> Result<Self, ContractViolation> {
        let req = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            envelope,
            raw_tokens,
        };
        req.validate()?;
        Ok(req)
    }
}

impl Validate for TokenClassifyRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "token_classify_request.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        self.envelope.validate()?;
        if self.raw_tokens.len() > 512 {
            return Err(ContractViolation::InvalidValue {
                field: "token_classify_request.raw_tokens",
                reason: "must contain <= 512 tokens",
            });
        }
        for token in &self.raw_tokens {
            token.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClassifyOk {
    pub schema_version: SchemaVersion,
    pub reason_code: ReasonCodeId,
    pub tokens: Vec<ClassifiedToken>,
}

impl TokenClassifyOk {
    pub fn v1(
        reason_code: ReasonCodeId,
        tokens: Vec<ClassifiedToken>,
    ) -> Result<Self, ContractViolation> {
        let ok = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            reason_code,
            tokens,
        };
        ok.validate()?;
        Ok(ok)
    }
}

impl Validate for TokenClassifyOk {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "token_classify_ok.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        if self.tokens.len() > 512 {
            return Err(ContractViolation::InvalidValue {
                field: "token_classify_ok.tokens",
                reason: "must contain <= 512 tokens",
            });
        }
        for token in &self.tokens {
            token.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntentRequest {
    pub schema_version: SchemaVersion,
    pub envelope: OrderRequestEnvelope,
    pub tokens: Vec<ClassifiedToken>,
}

impl OrderIntentRequest {
    pub fn v1(
        envelope: OrderRequestEnvelope,
        tokens: Vec<ClassifiedToken>,
    ) -> Result<Self, ContractViolation> {
        let req = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            envelope,
            tokens,
        };
        req.validate()?;
        Ok(req)
    }
}

impl Validate for OrderIntentRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "order_intent_request.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        self.envelope.validate()?;
        if self.tokens.len() > 512 {
            return Err(ContractViolation::InvalidValue {
                field: "order_intent_request.tokens",
                reason: "must contain <= 512 tokens",
            });
        }
        for token in &self.tokens {
            token.validate()?;
        }
        Ok(())
    }
}

/// View-intent signals a single token can carry. Both may fire on the same
/// token; detection never consumes the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewIntentSignal {
    ViewMenu,
    ViewCart,
}

/// Latched once true for the remainder of the utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFlags {
    pub menu: bool,
    pub cart: bool,
}

/// One signed quantity change for the caller-owned cart. Positive adds,
/// negative removes; zero is not a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartDelta {
    pub schema_version: SchemaVersion,
    pub name: String,
    pub quantity: i32,
}

impl CartDelta {
    pub fn v1(name: String, quantity: i32) -> Result<Self, ContractViolation> {
        let delta = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            name,
            quantity,
        };
        delta.validate()?;
        Ok(delta)
    }
}

impl Validate for CartDelta {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "cart_delta.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        validate_text("cart_delta.name", &self.name, 96)?;
        if self.quantity == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "cart_delta.quantity",
                reason: "must be nonzero",
            });
        }
        if !(-1_000_000..=1_000_000).contains(&self.quantity) {
            return Err(ContractViolation::InvalidValue {
                field: "cart_delta.quantity",
                reason: "must be within -1000000..=1000000",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntentOk {
    pub schema_version: SchemaVersion,
    pub reason_code: ReasonCodeId,
    pub deltas: Vec<CartDelta>,
    pub view: ViewFlags,
}

impl OrderIntentOk {
    pub fn v1(
        reason_code: ReasonCodeId,
        deltas: Vec<CartDelta>,
        view: ViewFlags,
    ) -> Result<Self, ContractViolation> {
        let ok = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            reason_code,
            deltas,
            view,
        };
        ok.validate()?;
        Ok(ok)
    }
}

impl Validate for OrderIntentOk {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "order_intent_ok.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        if self.deltas.len() > 512 {
            return Err(ContractViolation::InvalidValue {
                field: "order_intent_ok.deltas",
                reason: "must contain <= 512 deltas",
            });
        }
        for delta in &self.deltas {
            delta.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenReplyRequest {
    pub schema_version: SchemaVersion,
    pub envelope: OrderRequestEnvelope,
    pub deltas: Vec<CartDelta>,
    pub view: ViewFlags,
}

impl SpokenReplyRequest {
    pub fn v1(
        envelope: OrderRequestEnvelope,
        deltas: Vec<CartDelta>,
        view: ViewFlags,
    ) -> Result<Self, ContractViolation> {
        let req = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            envelope,
            deltas,
            view,
        };
        req.validate()?;
        Ok(req)
    }
}

impl Validate for SpokenReplyRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_reply_request.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        self.envelope.validate()?;
        if self.deltas.len() > 512 {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_reply_request.deltas",
                reason: "must contain <= 512 deltas",
            });
        }
        for delta in &self.deltas {
            delta.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpokenMessageKind {
    AddedSummary,
    RemovedSummary,
    MenuPreview,
    CartPreview,
    RepeatRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenMessage {
    pub schema_version: SchemaVersion,
    pub kind: SpokenMessageKind,
    pub text: String,
}

impl SpokenMessage {
    pub fn v1(kind: SpokenMessageKind, text: String) -> Result<Self, ContractViolation> {
        let message = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            kind,
            text,
        };
        message.validate()?;
        Ok(message)
    }
}

impl Validate for SpokenMessage {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_message.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        validate_text("spoken_message.text", &self.text, 4096)?;
        Ok(())
    }
}

/// The reply rendered (and spoken) by the caller. Always one or two
/// messages; when both summaries are present the add-summary comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenReplyOk {
    pub schema_version: SchemaVersion,
    pub reason_code: ReasonCodeId,
    pub messages: Vec<SpokenMessage>,
}

impl SpokenReplyOk {
    pub fn v1(
        reason_code: ReasonCodeId,
        messages: Vec<SpokenMessage>,
    ) -> Result<Self, ContractViolation> {
        let ok = Self {
            schema_version: ORDER_CONTRACT_VERSION,
            reason_code,
            messages,
        };
        ok.validate()?;
        Ok(ok)
    }
}

impl Validate for SpokenReplyOk {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ORDER_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_reply_ok.schema_version",
                reason: "must match ORDER_CONTRACT_VERSION",
            });
        }
        if self.messages.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_reply_ok.messages",
                reason: "must contain at least one message",
            });
        }
        if self.messages.len() > 2 {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_reply_ok.messages",
                reason: "must contain <= 2 messages",
            });
        }
        if self.messages.len() == 2 {
            let kinds = (self.messages[0].kind, self.messages[1].kind);
            if kinds != (SpokenMessageKind::AddedSummary, SpokenMessageKind::RemovedSummary) {
                return Err(ContractViolation::InvalidValue {
                    field: "spoken_reply_ok.messages",
                    reason: "two messages must be add-summary then remove-summary",
                });
            }
        }
        for message in &self.messages {
            message.validate()?;
        }
        Ok(())
    }
}

fn validate_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if value.trim().is_empty() {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not be empty",
        });
    }
    if value.len() > max_len {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "exceeds max length",
        });
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not contain control characters",
        });
    }
    Ok(())
}

fn validate_quantity_text(field: &'static str, value: &str) -> Result<(), ContractViolation> {
    if value.is_empty() || value.len() > 7 {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "number text must be 1..=7 chars",
        });
    }
    if value.chars().any(|c| !c.is_ascii_digit()) {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "number text must be decimal digits",
        });
    }
    match value.parse::<i32>() {
        Ok(parsed) if parsed >= 1 => Ok(()),
        _ => Err(ContractViolation::InvalidValue {
            field,
            reason: "number text must parse to a positive quantity",
        }),
    }
}
