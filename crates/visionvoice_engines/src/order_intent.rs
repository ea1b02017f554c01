#![forbid(unsafe_code)]

use std::cmp::min;
use std::collections::BTreeSet;

use visionvoice_kernel_contracts::order::{
    CartDelta, ClassifiedToken, OrderIntentOk, OrderIntentRequest, TokenCategory, ViewFlags,
    ViewIntentSignal,
};
use visionvoice_kernel_contracts::{ContractViolation, ReasonCodeId, Validate};

pub mod reason_codes {
    use visionvoice_kernel_contracts::ReasonCodeId;

    // VV.INTENT reason-code namespace.
    pub const VI_OK_SCAN: ReasonCodeId = ReasonCodeId(0x5649_0001);
}

const ADD_KEYWORDS: &[&str] = &["추가", "담아", "담기", "넣어", "주문"];
const REMOVE_KEYWORDS: &[&str] = &["빼", "제거", "취소", "삭제"];

/// Particles, counters and politeness fillers that carry no order signal.
const STOP_WORDS: &[&str] = &[
    "이", "가", "을", "를", "은", "는", "도", "의", "와", "과", "하고", "이랑", "랑", "에",
    "에서", "으로", "로", "요", "좀", "개", "병", "잔", "줘", "해", "해줘", "주세요",
    "해주세요", "그리고", "또",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderIntentConfig {
    pub max_tokens: u16,
    pub add_keywords: &'static [&'static str],
    pub remove_keywords: &'static [&'static str],
    pub stop_words: &'static [&'static str],
}

impl OrderIntentConfig {
    pub fn default_ko_v1() -> Self {
        Self {
            max_tokens: 256,
            add_keywords: ADD_KEYWORDS,
            remove_keywords: REMOVE_KEYWORDS,
            stop_words: STOP_WORDS,
        }
    }
}

/// View-intent signals carried by a single token. Menu and cart checks are
/// independent prefix matches; detection never consumes the token, which
/// still flows through the remaining scan rules.
pub fn classify_view_intent(text: &str) -> BTreeSet<ViewIntentSignal> {
    let mut signals = BTreeSet::new();
    if text.starts_with("메뉴") || text.starts_with("상품") {
        signals.insert(ViewIntentSignal::ViewMenu);
    }
    if text.starts_with("장바구니") {
        signals.insert(ViewIntentSignal::ViewCart);
    }
    signals
}

/// Running state of the single-pass scan.
///
/// `pending_names` holds nouns seen since the last commit or quantity
/// assignment; `staged` holds the current quantity-tagged batch awaiting a
/// commit keyword; `deltas` is the committed output in commit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderScanState {
    pending_names: Vec<String>,
    staged: Vec<(String, i32)>,
    deltas: Vec<(String, i32)>,
    view: ViewFlags,
}

impl OrderScanState {
    pub fn step(
        &mut self,
        config: &OrderIntentConfig,
        token: &ClassifiedToken,
    ) -> Result<(), ContractViolation> {
        for signal in classify_view_intent(&token.text) {
            match signal {
                ViewIntentSignal::ViewMenu => self.view.menu = true,
                ViewIntentSignal::ViewCart => self.view.cart = true,
            }
        }

        let text = token.text.as_str();
        if config.stop_words.contains(&text) {
            return Ok(());
        }

        let is_add = config.add_keywords.contains(&text);
        let is_remove = config.remove_keywords.contains(&text);
        if is_add || is_remove {
            let sign: i32 = if is_add { 1 } else { -1 };
            if !self.staged.is_empty() {
                // A staged batch outranks bare pending names.
                for (name, quantity) in self.staged.drain(..) {
                    self.deltas.push((name, sign * quantity));
                }
                self.pending_names.clear();
            } else if !self.pending_names.is_empty() {
                for name in self.pending_names.drain(..) {
                    self.deltas.push((name, sign));
                }
            }
            // A commit keyword with nothing accumulated is a no-op.
            return Ok(());
        }

        match token.category {
            TokenCategory::Number => {
                let value = match token.text.parse::<i32>() {
                    Ok(value) => value,
                    Err(_) => {
                        return Err(ContractViolation::InvalidValue {
                            field: "order_intent_request.tokens",
                            reason: "number token text must parse as a quantity",
                        })
                    }
                };
                for name in &self.pending_names {
                    let already_staged =
                        self.staged.iter().any(|(staged, _)| staged == name);
                    if !already_staged {
                        self.staged.push((name.clone(), value));
                    }
                }
                // pending_names survives quantity assignment; only the
                // staged-name dedup blocks re-staging. See the scan tests.
            }
            TokenCategory::Noun => {
                self.pending_names.push(token.text.clone());
            }
        }
        Ok(())
    }

    /// Finalize the scan. Anything never committed by a keyword is
    /// discarded here.
    pub fn into_ok(self, reason_code: ReasonCodeId) -> Result<OrderIntentOk, ContractViolation> {
        let mut deltas = Vec::with_capacity(self.deltas.len());
        for (name, quantity) in self.deltas {
            deltas.push(CartDelta::v1(name, quantity)?);
        }
        OrderIntentOk::v1(reason_code, deltas, self.view)
    }
}

#[derive(Debug, Clone)]
pub struct OrderIntentRuntime {
    config: OrderIntentConfig,
}

impl OrderIntentRuntime {
    pub fn new(config: OrderIntentConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, req: &OrderIntentRequest) -> Result<OrderIntentOk, ContractViolation> {
        req.validate()?;
        let budget = min(
            req.envelope.max_tokens as usize,
            self.config.max_tokens as usize,
        );
        if req.tokens.len() > budget {
            return Err(ContractViolation::InvalidValue {
                field: "order_intent_request.tokens",
                reason: "exceeds configured token budget",
            });
        }

        let mut state = OrderScanState::default();
        for token in &req.tokens {
            state.step(&self.config, token)?;
        }
        state.into_ok(reason_codes::VI_OK_SCAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visionvoice_kernel_contracts::order::OrderRequestEnvelope;
    use visionvoice_kernel_contracts::TurnId;

    fn noun(text: &str) -> ClassifiedToken {
        ClassifiedToken::v1(text.to_string(), TokenCategory::Noun).unwrap()
    }

    fn number(value: i32) -> ClassifiedToken {
        ClassifiedToken::v1(value.to_string(), TokenCategory::Number).unwrap()
    }

    fn run(tokens: Vec<ClassifiedToken>) -> OrderIntentOk {
        let rt = OrderIntentRuntime::new(OrderIntentConfig::default_ko_v1());
        let envelope = OrderRequestEnvelope::v1(TurnId(1), 128).unwrap();
        rt.run(&OrderIntentRequest::v1(envelope, tokens).unwrap())
            .unwrap()
    }

    fn delta_pairs(ok: &OrderIntentOk) -> Vec<(String, i32)> {
        ok.deltas
            .iter()
            .map(|d| (d.name.clone(), d.quantity))
            .collect()
    }

    #[test]
    fn at_vi_01_quantity_then_add_commits_staged_batch() {
        let ok = run(vec![noun("우유"), number(2), noun("추가")]);
        assert_eq!(delta_pairs(&ok), vec![("우유".to_string(), 2)]);
    }

    #[test]
    fn at_vi_02_quantity_less_add_commits_pending_at_one() {
        let ok = run(vec![noun("우유"), noun("추가")]);
        assert_eq!(delta_pairs(&ok), vec![("우유".to_string(), 1)]);
    }

    #[test]
    fn at_vi_03_remove_keyword_negates_quantity() {
        let ok = run(vec![noun("우유"), number(1), noun("빼")]);
        assert_eq!(delta_pairs(&ok), vec![("우유".to_string(), -1)]);
    }

    #[test]
    fn at_vi_04_two_batches_commit_in_order_without_dedup() {
        let ok = run(vec![
            noun("우유"),
            number(2),
            noun("추가"),
            noun("콜라"),
            number(3),
            noun("추가"),
        ]);
        assert_eq!(
            delta_pairs(&ok),
            vec![("우유".to_string(), 2), ("콜라".to_string(), 3)]
        );
    }

    #[test]
    fn at_vi_05_same_name_across_batches_is_repeated_not_merged() {
        let ok = run(vec![
            noun("우유"),
            number(2),
            noun("추가"),
            noun("우유"),
            number(1),
            noun("빼"),
        ]);
        assert_eq!(
            delta_pairs(&ok),
            vec![("우유".to_string(), 2), ("우유".to_string(), -1)]
        );
    }

    #[test]
    fn at_vi_06_uncommitted_tail_is_discarded() {
        let ok = run(vec![noun("우유"), number(2)]);
        assert!(ok.deltas.is_empty());
    }

    #[test]
    fn at_vi_07_commit_keyword_with_nothing_accumulated_is_noop() {
        let ok = run(vec![noun("추가"), noun("빼")]);
        assert!(ok.deltas.is_empty());
    }

    #[test]
    fn at_vi_08_stop_words_are_skipped_entirely() {
        let ok = run(vec![noun("우유"), noun("를"), number(2), noun("개"), noun("추가")]);
        assert_eq!(delta_pairs(&ok), vec![("우유".to_string(), 2)]);
    }

    #[test]
    fn at_vi_09_view_intent_latches_and_is_non_exclusive() {
        let ok = run(vec![noun("메뉴판"), noun("장바구니")]);
        assert!(ok.view.menu);
        assert!(ok.view.cart);
        assert!(ok.deltas.is_empty());
    }

    #[test]
    fn at_vi_10_view_token_still_accumulates_as_a_noun() {
        // Detection does not consume the token: "메뉴" lands in pending
        // names and commits like any other noun.
        let ok = run(vec![noun("메뉴"), noun("추가")]);
        assert!(ok.view.menu);
        assert_eq!(delta_pairs(&ok), vec![("메뉴".to_string(), 1)]);
    }

    #[test]
    fn at_vi_11_first_quantity_wins_for_duplicate_pending_names() {
        let ok = run(vec![noun("우유"), noun("우유"), number(2), noun("추가")]);
        assert_eq!(delta_pairs(&ok), vec![("우유".to_string(), 2)]);
    }

    #[test]
    fn at_vi_12_pending_names_survive_quantity_assignment() {
        // Shipped behavior: staging a quantity does not clear pending
        // names. The second number cannot re-stage "우유" (staged dedup)
        // but it does stage the noun that arrived after the first number.
        let mut state = OrderScanState::default();
        let config = OrderIntentConfig::default_ko_v1();
        state.step(&config, &noun("우유")).unwrap();
        state.step(&config, &number(2)).unwrap();
        assert_eq!(state.pending_names, vec!["우유".to_string()]);
        assert_eq!(state.staged, vec![("우유".to_string(), 2)]);

        state.step(&config, &noun("콜라")).unwrap();
        state.step(&config, &number(3)).unwrap();
        assert_eq!(
            state.staged,
            vec![("우유".to_string(), 2), ("콜라".to_string(), 3)]
        );
        assert_eq!(
            state.pending_names,
            vec!["우유".to_string(), "콜라".to_string()]
        );

        state.step(&config, &noun("추가")).unwrap();
        assert!(state.staged.is_empty());
        assert!(state.pending_names.is_empty());
        assert_eq!(
            state.deltas,
            vec![("우유".to_string(), 2), ("콜라".to_string(), 3)]
        );
    }

    #[test]
    fn at_vi_13_staged_batch_outranks_pending_names_on_commit() {
        // "우유" is staged with 2, "콜라" is pending without a quantity
        // when the commit arrives: only the staged batch is committed.
        let ok = run(vec![noun("우유"), number(2), noun("콜라"), noun("추가")]);
        assert_eq!(delta_pairs(&ok), vec![("우유".to_string(), 2)]);
    }

    #[test]
    fn at_vi_14_budget_overflow_is_refused() {
        let rt = OrderIntentRuntime::new(OrderIntentConfig::default_ko_v1());
        let envelope = OrderRequestEnvelope::v1(TurnId(1), 2).unwrap();
        let req =
            OrderIntentRequest::v1(envelope, vec![noun("우유"), number(2), noun("추가")]).unwrap();
        assert!(rt.run(&req).is_err());
    }

    #[test]
    fn at_vi_15_classify_view_intent_is_a_pure_signal_set() {
        assert!(classify_view_intent("우유").is_empty());
        assert!(classify_view_intent("메뉴").contains(&ViewIntentSignal::ViewMenu));
        assert!(classify_view_intent("메뉴판").contains(&ViewIntentSignal::ViewMenu));
        assert!(classify_view_intent("상품").contains(&ViewIntentSignal::ViewMenu));
        assert!(classify_view_intent("장바구니").contains(&ViewIntentSignal::ViewCart));
        assert!(classify_view_intent("장바구니목록").contains(&ViewIntentSignal::ViewCart));
    }
}
