use paste_types::Credential;
use uuid::Uuid;

/// Issue a fresh credential: the first [`Credential::LEN`] characters of a
/// random UUIDv4.
pub fn generate_credential() -> Credential {
    let uuid = Uuid::new_v4().to_string();
    Credential::new(&uuid[..Credential::LEN])
}
