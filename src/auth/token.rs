//! The session token shared with the authentication service.
//!
//! The cookie value is a JSON object such as
//! `{"owner_id":1,"expires_at":"2025-12-21T00:00:00Z"}`, with the expiry in
//! RFC 3339 format. The authentication service writes tokens in this format
//! and this server reads them back, so changing it breaks existing sessions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::OwnerId;

/// Who a session belongs to and when it ends.
///
/// The token travels in a private (encrypted and signed) cookie, so its
/// contents can be trusted once the cookie has been decrypted.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub owner_id: OwnerId,

    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}
