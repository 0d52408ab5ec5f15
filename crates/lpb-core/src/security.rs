use crate::domain::UserId;

/// Single-owner authorization: only the configured owner may publish or use AI.
pub fn is_owner(user_id: Option<UserId>, owner: UserId) -> bool {
    user_id == Some(owner)
}
