use super::InventoryError;

/// 純粋関数：在庫数を増減する
///
/// 不変条件：在庫数は0未満にならない。
/// 0未満になる調整はクランプせずエラーを返す。
pub fn adjust_count(current: i64, delta: i64) -> Result<i64, InventoryError> {
    let next = current
        .checked_add(delta)
        .ok_or(InventoryError::Overflow { current, delta })?;

    if next < 0 {
        return Err(InventoryError::Underflow { current, delta });
    }

    Ok(next)
}
