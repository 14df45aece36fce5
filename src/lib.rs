//! # membership-filter
//!
//! `membership-filter` is a single-hash membership filter. A one-byte value is absorbed by any
//! [`digest::Digest`] implementation, the leading bytes of the digest output are decoded as a
//! zigzag varint, and the absolute value of the result is used as an offset into a bit vector
//! that grows on demand.
//!
//! The filter never reports a false negative. False positives come only from `n` and `-n`
//! sharing a bit after normalization.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! membership-filter = "*"
//! ```
//!
//! ```rust
//! use membership_filter::{Error, MembershipFilter};
//! use sha2::{Digest, Sha256};
//!
//! let mut filter = MembershipFilter::new();
//!
//! let index = filter.insert_value(&mut Sha256::new(), "a").unwrap();
//! assert!(filter.contains(index));
//!
//! assert_eq!(
//!     filter.insert_value(&mut Sha256::new(), "ab"),
//!     Err(Error::ValueLength { len: 2 }),
//! );
//! ```
//!
//! Any type implementing [`digest::Digest`] and `Clone` can be used, including the keyed,
//! non-cryptographic [`SipDigest`].
//!
//! ## Features
//!
//! - `serde`: derives `Serialize` and `Deserialize` for [`MembershipFilter`], [`FilterConfig`]
//!   and [`bit_vec::BitVec`].

#![warn(missing_docs)]

pub mod bit_vec;
mod error;
pub mod index;
mod membership;
mod sip;
pub mod varint;

pub use self::error::{Error, Result};
pub use self::membership::{FilterConfig, MembershipFilter};
pub use self::sip::SipDigest;
