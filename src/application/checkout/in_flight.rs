use crate::domain::CheckoutId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 処理中の返却の登録簿
///
/// 同じ貸出記録に対する返却は同時に1件まで。
/// 連打などによる状態遷移と在庫加算の重複を防ぐ。
#[derive(Debug, Default)]
pub struct InFlightReturns {
    active: Mutex<HashSet<CheckoutId>>,
}

impl InFlightReturns {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> MutexGuard<'_, HashSet<CheckoutId>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 返却処理を開始する
    ///
    /// 既に処理中なら `None`。返したガードがドロップされると登録が解除される。
    pub fn try_begin(self: &Arc<Self>, checkout_id: &CheckoutId) -> Option<InFlightGuard> {
        if !self.active().insert(checkout_id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            registry: Arc::clone(self),
            checkout_id: checkout_id.clone(),
        })
    }

    pub fn contains(&self, checkout_id: &CheckoutId) -> bool {
        self.active().contains(checkout_id)
    }
}

/// 処理中の返却1件分の登録
#[derive(Debug)]
pub struct InFlightGuard {
    registry: Arc<InFlightReturns>,
    checkout_id: CheckoutId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.active().remove(&self.checkout_id);
    }
}
