pub mod codec;
pub mod cookies;

pub use self::codec::{TokenCodec, TokenError, TokenKind, TokenPayload};
pub use self::cookies::{Credentials, SetCookie};
