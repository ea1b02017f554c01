#![forbid(unsafe_code)]

use std::cmp::min;

use visionvoice_kernel_contracts::order::{
    ClassifiedToken, TokenCategory, TokenClassifyOk, TokenClassifyRequest,
};
use visionvoice_kernel_contracts::{ContractViolation, Validate};

use crate::number_lexicon::NumberLexicon;

pub mod reason_codes {
    use visionvoice_kernel_contracts::ReasonCodeId;

    // VV.TOKEN reason-code namespace.
    pub const VT_OK_CLASSIFY: ReasonCodeId = ReasonCodeId(0x5654_0001);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTokenConfig {
    pub max_tokens: u16,
    pub lexicon: NumberLexicon,
}

impl OrderTokenConfig {
    pub fn default_ko_v1() -> Self {
        Self {
            max_tokens: 256,
            lexicon: NumberLexicon::default_ko_v1(),
        }
    }
}

/// Classifies the tokenizer's annotated tokens into `Number`/`Noun`
/// tokens. Number words resolve through the lexicon and carry the decimal
/// string of the summed match; everything else keeps lemma-else-surface.
/// Order is preserved and no token is dropped.
#[derive(Debug, Clone)]
pub struct OrderTokenRuntime {
    config: OrderTokenConfig,
}

impl OrderTokenRuntime {
    pub fn new(config: OrderTokenConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, req: &TokenClassifyRequest) -> Result<TokenClassifyOk, ContractViolation> {
        req.validate()?;
        let budget = min(
            req.envelope.max_tokens as usize,
            self.config.max_tokens as usize,
        );
        if req.raw_tokens.len() > budget {
            return Err(ContractViolation::InvalidValue {
                field: "token_classify_request.raw_tokens",
                reason: "exceeds configured token budget",
            });
        }

        let mut tokens = Vec::with_capacity(req.raw_tokens.len());
        for raw in &req.raw_tokens {
            let token = match self.config.lexicon.resolve(&raw.surface) {
                Some(value) => {
                    ClassifiedToken::v1(value.to_string(), TokenCategory::Number)?
                }
                None => {
                    let text = if raw.lemma.trim().is_empty() {
                        raw.surface.clone()
                    } else {
                        raw.lemma.clone()
                    };
                    ClassifiedToken::v1(text, TokenCategory::Noun)?
                }
            };
            tokens.push(token);
        }
        TokenClassifyOk::v1(reason_codes::VT_OK_CLASSIFY, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionvoice_kernel_contracts::morph::RawToken;
    use visionvoice_kernel_contracts::order::OrderRequestEnvelope;
    use visionvoice_kernel_contracts::TurnId;

    fn raw(surface: &str, lemma: &str) -> RawToken {
        RawToken::v1(surface.to_string(), lemma.to_string(), "NNG".to_string()).unwrap()
    }

    fn run(raw_tokens: Vec<RawToken>) -> TokenClassifyOk {
        let rt = OrderTokenRuntime::new(OrderTokenConfig::default_ko_v1());
        let envelope = OrderRequestEnvelope::v1(TurnId(1), 128).unwrap();
        rt.run(&TokenClassifyRequest::v1(envelope, raw_tokens).unwrap())
            .unwrap()
    }

    #[test]
    fn at_vt_01_number_words_resolve_to_decimal_text() {
        let ok = run(vec![raw("두", ""), raw("스물", ""), raw("백", "")]);
        let texts: Vec<&str> = ok.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["2", "20", "100"]);
        assert!(ok
            .tokens
            .iter()
            .all(|t| t.category == TokenCategory::Number));
    }

    #[test]
    fn at_vt_02_nouns_prefer_lemma_over_surface() {
        let ok = run(vec![raw("우유를", "우유"), raw("콜라", "")]);
        assert_eq!(ok.tokens[0].text, "우유");
        assert_eq!(ok.tokens[1].text, "콜라");
        assert!(ok.tokens.iter().all(|t| t.category == TokenCategory::Noun));
    }

    #[test]
    fn at_vt_03_blank_lemma_falls_back_to_surface() {
        let ok = run(vec![raw("우유", " ")]);
        assert_eq!(ok.tokens[0].text, "우유");
    }

    #[test]
    fn at_vt_04_unresolvable_number_like_word_is_a_noun() {
        // A compound numeral the tokenizer did not split stays a noun.
        let ok = run(vec![raw("이십오", "")]);
        assert_eq!(ok.tokens[0].category, TokenCategory::Noun);
        assert_eq!(ok.tokens[0].text, "이십오");
    }

    #[test]
    fn at_vt_05_order_is_preserved_and_nothing_is_dropped() {
        let ok = run(vec![raw("우유", ""), raw("두", ""), raw("추가", "")]);
        assert_eq!(ok.tokens.len(), 3);
        assert_eq!(ok.tokens[0].text, "우유");
        assert_eq!(ok.tokens[1].text, "2");
        assert_eq!(ok.tokens[2].text, "추가");
    }

    #[test]
    fn at_vt_06_empty_utterance_classifies_to_empty_sequence() {
        let ok = run(vec![]);
        assert!(ok.tokens.is_empty());
    }

    #[test]
    fn at_vt_07_budget_overflow_is_refused() {
        let rt = OrderTokenRuntime::new(OrderTokenConfig::default_ko_v1());
        let envelope = OrderRequestEnvelope::v1(TurnId(1), 1).unwrap();
        let req =
            TokenClassifyRequest::v1(envelope, vec![raw("우유", ""), raw("두", "")]).unwrap();
        assert!(rt.run(&req).is_err());
    }
}
