//! Placeholder service names.

use uuid::Uuid;

const ADJECTIVES: [&str; 16] = [
    "amber", "brisk", "calm", "dapper", "eager", "fuzzy", "gentle", "hasty", "icy", "jolly",
    "keen", "lucky", "mellow", "nimble", "quiet", "rusty",
];

const ANIMALS: [&str; 16] = [
    "badger", "crane", "dingo", "egret", "ferret", "gecko", "heron", "ibis", "jackal", "koala",
    "lemur", "marmot", "newt", "otter", "puffin", "quail",
];

/// Random human-readable name, e.g. `brisk-otter-3fa2`.
pub fn placeholder_name() -> String {
    from_uuid(Uuid::new_v4())
}

fn from_uuid(id: Uuid) -> String {
    let bytes = id.as_bytes();
    let adjective = ADJECTIVES[usize::from(bytes[0]) % ADJECTIVES.len()];
    let animal = ANIMALS[usize::from(bytes[1]) % ANIMALS.len()];
    format!("{}-{}-{:02x}{:02x}", adjective, animal, bytes[2], bytes[3])
}
