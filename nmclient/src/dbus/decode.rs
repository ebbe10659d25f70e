//! Typed decoding of dynamically-typed bus replies.
//!
//! The transport hands back positional reply fields as [`OwnedValue`]s. Each
//! function here checks one reply shape and converts it into the typed value
//! the caller expects, reporting a [`BusError::Decode`] naming the member
//! when the shape does not match.

use std::fmt::Display;
use zvariant::OwnedValue;

use crate::Result;
use crate::api::models::BusError;
use crate::dbus::members::Member;

fn expect_arity(reply: &[OwnedValue], expected: usize, member: Member) -> Result<()> {
    if reply.len() == expected {
        Ok(())
    } else {
        Err(BusError::decode(
            member,
            format!("expected {expected} reply field(s), got {}", reply.len()),
        ))
    }
}

/// Decodes a single property value.
pub(crate) fn property<T>(value: OwnedValue, member: Member) -> Result<T>
where
    T: TryFrom<OwnedValue>,
    T::Error: Display,
{
    T::try_from(value).map_err(|e| BusError::decode(member, e))
}

/// Decodes a reply that carries no fields.
pub(crate) fn empty(reply: Vec<OwnedValue>, member: Member) -> Result<()> {
    expect_arity(&reply, 0, member)
}

/// Decodes a reply that carries exactly one field.
pub(crate) fn single<T>(reply: Vec<OwnedValue>, member: Member) -> Result<T>
where
    T: TryFrom<OwnedValue>,
    T::Error: Display,
{
    expect_arity(&reply, 1, member)?;
    let mut fields = reply.into_iter();
    match fields.next() {
        Some(value) => property(value, member),
        None => Err(BusError::decode(member, "reply field missing")),
    }
}

/// Decodes a reply that carries exactly two fields.
pub(crate) fn pair<A, B>(reply: Vec<OwnedValue>, member: Member) -> Result<(A, B)>
where
    A: TryFrom<OwnedValue>,
    A::Error: Display,
    B: TryFrom<OwnedValue>,
    B::Error: Display,
{
    expect_arity(&reply, 2, member)?;
    let mut fields = reply.into_iter();
    match (fields.next(), fields.next()) {
        (Some(first), Some(second)) => Ok((property(first, member)?, property(second, member)?)),
        _ => Err(BusError::decode(member, "reply field missing")),
    }
}
