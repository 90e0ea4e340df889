use super::requests::CreateUserInput;

/// Sample registrations used to seed an empty in-memory backend.
pub fn seed_users() -> Vec<CreateUserInput> {
    [
        ("Ada", "Lovelace"),
        ("Grace", "Hopper"),
        ("Jane", "Austen"),
        ("Mary", "Jane"),
        ("Alan", "Turing"),
    ]
    .into_iter()
    .map(|(first, last)| CreateUserInput::new(first, last))
    .collect()
}
