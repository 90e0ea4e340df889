use super::requests::UserPatch;
use super::types::User;

/// Returns true if the user's first or last name contains `term`, ignoring case.
///
/// The term is trimmed first; an empty term matches every user.
pub fn matches_search(user: &User, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    user.first_name.to_lowercase().contains(&needle)
        || user.last_name.to_lowercase().contains(&needle)
}

/// Sorts users by last name, then first name, then identifier.
pub fn sort_users(users: &mut [User]) {
    users.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Applies a partial update, leaving absent fields untouched.
pub fn apply_patch(user: &mut User, patch: &UserPatch) {
    if let Some(first_name) = &patch.first_name {
        user.first_name = first_name.clone();
    }
    if let Some(last_name) = &patch.last_name {
        user.last_name = last_name.clone();
    }
}
