#![forbid(unsafe_code)]

use std::cmp::min;

use visionvoice_kernel_contracts::order::{
    CartDelta, SpokenMessage, SpokenMessageKind, SpokenReplyOk, SpokenReplyRequest,
};
use visionvoice_kernel_contracts::{ContractViolation, Validate};

pub mod reason_codes {
    use visionvoice_kernel_contracts::ReasonCodeId;

    // VV.REPLY reason-code namespace.
    pub const VR_OK_SUMMARY: ReasonCodeId = ReasonCodeId(0x5652_0001);
    pub const VR_OK_MENU_PREVIEW: ReasonCodeId = ReasonCodeId(0x5652_0002);
    pub const VR_OK_CART_PREVIEW: ReasonCodeId = ReasonCodeId(0x5652_0003);
    pub const VR_OK_REPEAT_REQUEST: ReasonCodeId = ReasonCodeId(0x5652_0004);
}

pub const ADD_SUFFIX: &str = "를 추가하셨습니다";
pub const REMOVE_SUFFIX: &str = "를 제거하셨습니다";
pub const MENU_PREVIEW_TEXT: &str = "잠시 후 메뉴 목록을 알려드리겠습니다";
pub const CART_PREVIEW_TEXT: &str = "잠시 후 장바구니 목록을 알려드리겠습니다";
pub const REPEAT_REQUEST_TEXT: &str = "죄송합니다. 다시 한 번 말씀해 주세요";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReplyConfig {
    pub max_deltas: u16,
}

impl OrderReplyConfig {
    pub fn default_ko_v1() -> Self {
        Self { max_deltas: 256 }
    }
}

/// Turns the committed deltas and view flags into the spoken reply:
/// sign-partitioned summaries first, then the menu/cart previews, then the
/// repeat-request fallback. The reply always has one or two messages.
#[derive(Debug, Clone)]
pub struct OrderReplyRuntime {
    config: OrderReplyConfig,
}

impl OrderReplyRuntime {
    pub fn new(config: OrderReplyConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, req: &SpokenReplyRequest) -> Result<SpokenReplyOk, ContractViolation> {
        req.validate()?;
        let budget = min(
            req.envelope.max_tokens as usize,
            self.config.max_deltas as usize,
        );
        if req.deltas.len() > budget {
            return Err(ContractViolation::InvalidValue {
                field: "spoken_reply_request.deltas",
                reason: "exceeds configured delta budget",
            });
        }

        let added = summarize(&req.deltas, true);
        let removed = summarize(&req.deltas, false);

        let mut messages = Vec::new();
        if let Some(summary) = added {
            messages.push(SpokenMessage::v1(
                SpokenMessageKind::AddedSummary,
                format!("{summary}{ADD_SUFFIX}"),
            )?);
        }
        if let Some(summary) = removed {
            messages.push(SpokenMessage::v1(
                SpokenMessageKind::RemovedSummary,
                format!("{summary}{REMOVE_SUFFIX}"),
            )?);
        }

        if !messages.is_empty() {
            return SpokenReplyOk::v1(reason_codes::VR_OK_SUMMARY, messages);
        }

        if req.view.menu {
            return SpokenReplyOk::v1(
                reason_codes::VR_OK_MENU_PREVIEW,
                vec![SpokenMessage::v1(
                    SpokenMessageKind::MenuPreview,
                    MENU_PREVIEW_TEXT.to_string(),
                )?],
            );
        }
        if req.view.cart {
            return SpokenReplyOk::v1(
                reason_codes::VR_OK_CART_PREVIEW,
                vec![SpokenMessage::v1(
                    SpokenMessageKind::CartPreview,
                    CART_PREVIEW_TEXT.to_string(),
                )?],
            );
        }

        SpokenReplyOk::v1(
            reason_codes::VR_OK_REPEAT_REQUEST,
            vec![SpokenMessage::v1(
                SpokenMessageKind::RepeatRequest,
                REPEAT_REQUEST_TEXT.to_string(),
            )?],
        )
    }
}

/// "이름 수량개" items joined by single spaces, add side or remove side.
fn summarize(deltas: &[CartDelta], added: bool) -> Option<String> {
    let parts: Vec<String> = deltas
        .iter()
        .filter(|delta| (delta.quantity >= 1) == added)
        .map(|delta| format!("{} {}개", delta.name, delta.quantity.abs()))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
