use super::{BookId, CheckoutId};

/// 返却前の利用者確認の結果
///
/// 確認ダイアログ自体はUI側の責務。ここでは結果だけを受け取る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnConfirmation {
    Confirmed,
    Declined,
}

impl From<bool> for ReturnConfirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            ReturnConfirmation::Confirmed
        } else {
            ReturnConfirmation::Declined
        }
    }
}

/// コマンド：貸出申請を取り消す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelCheckout {
    pub checkout_id: CheckoutId,
    pub book_id: BookId,
}

/// コマンド：書籍の返却を申請する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnCheckout {
    pub checkout_id: CheckoutId,
    pub book_id: BookId,
    pub confirmation: ReturnConfirmation,
}

/// コマンド：書籍の在庫数を増減する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustBookCount {
    pub book_id: BookId,
    pub delta: i64,
}
