// Reciprocity difference: the one computation in this tool.

use crate::api::UserInfo;
use std::collections::HashMap;

/// Accounts present in `following` but absent from `followers`, compared
/// by user id, sorted case-insensitively by username.
pub fn non_followers(
    following: &HashMap<String, UserInfo>,
    followers: &HashMap<String, UserInfo>,
) -> Vec<UserInfo> {
    let mut result: Vec<UserInfo> = following
        .iter()
        .filter(|(user_id, _)| !followers.contains_key(*user_id))
        .map(|(_, user)| user.clone())
        .collect();
    result.sort_by_key(|user| user.username.to_lowercase());
    result
}
