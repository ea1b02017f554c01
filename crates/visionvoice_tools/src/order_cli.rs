#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use visionvoice_kernel_contracts::morph::{MorphTokenizer, RawToken, TokenizationError};
use visionvoice_kernel_contracts::TurnId;
use visionvoice_os::order_turn::{OrderTurnConfig, OrderTurnRuntime};

/// Persisted form of one tokenizer output token. Contract types stay
/// serde-free; this boundary owns the JSON shape and converts inward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTokenDto {
    pub surface: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub pos: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDeltaDto {
    pub name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTurnDto {
    pub deltas: Vec<CartDeltaDto>,
    pub messages: Vec<String>,
}

/// Stand-in tokenizer for offline runs over already-tokenized utterances.
pub struct PreTokenized {
    tokens: Vec<RawToken>,
}

impl PreTokenized {
    pub fn new(tokens: Vec<RawToken>) -> Self {
        Self { tokens }
    }
}

impl MorphTokenizer for PreTokenized {
    fn tokenize(&self, _transcript: &str) -> Result<Vec<RawToken>, TokenizationError> {
        Ok(self.tokens.clone())
    }
}

/// One offline order turn: token-array JSON in, deltas + reply JSON out.
pub fn run_order(input: &str) -> Result<String, String> {
    let dtos: Vec<RawTokenDto> =
        serde_json::from_str(input).map_err(|e| format!("invalid token JSON: {e}"))?;

    let mut tokens = Vec::with_capacity(dtos.len());
    for dto in dtos {
        let token = RawToken::v1(dto.surface, dto.lemma, dto.pos)
            .map_err(|violation| format!("invalid token: {violation:?}"))?;
        tokens.push(token);
    }

    // The offline path carries no transcript of its own; reconstruct one
    // from the surfaces so the turn layer sees a non-empty utterance.
    let transcript = tokens
        .iter()
        .map(|token| token.surface.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let runtime = OrderTurnRuntime::new(OrderTurnConfig::default_ko_v1());
    let outcome = runtime.run_turn(&PreTokenized::new(tokens), TurnId(1), &transcript);

    let dto = OrderTurnDto {
        deltas: outcome
            .deltas
            .iter()
            .map(|delta| CartDeltaDto {
                name: delta.name.clone(),
                quantity: delta.quantity,
            })
            .collect(),
        messages: outcome
            .messages
            .into_iter()
            .map(|message| message.text)
            .collect(),
    };
    serde_json::to_string_pretty(&dto).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_turn_round_trips_through_json() {
        let input = r#"[
            {"surface": "우유를", "lemma": "우유", "pos": "NNG"},
            {"surface": "두", "pos": "MM"},
            {"surface": "개", "pos": "NNB"},
            {"surface": "추가", "pos": "NNG"}
        ]"#;
        let output = run_order(input).unwrap();
        let parsed: OrderTurnDto = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.deltas.len(), 1);
        assert_eq!(parsed.deltas[0].name, "우유");
        assert_eq!(parsed.deltas[0].quantity, 2);
        assert_eq!(parsed.messages, vec!["우유 2개를 추가하셨습니다".to_string()]);
    }

    #[test]
    fn empty_token_array_yields_repeat_request() {
        let parsed: OrderTurnDto = serde_json::from_str(&run_order("[]").unwrap()).unwrap();
        assert!(parsed.deltas.is_empty());
        assert_eq!(parsed.messages.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_usage_error() {
        assert!(run_order("not json").is_err());
        assert!(run_order(r#"[{"lemma": "우유"}]"#).is_err());
    }

    #[test]
    fn invalid_token_fields_are_a_usage_error() {
        assert!(run_order(r#"[{"surface": "  "}]"#).is_err());
    }
}
