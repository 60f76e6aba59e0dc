use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    /// Serialize the object payload, without the envelope header
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Deserialize the object payload; the envelope header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// The full `<type> <len>\0<payload>` envelope as written to the database
    fn envelope(&self) -> Result<Bytes> {
        Ok(wrap_envelope(self.object_type(), &self.serialize()?))
    }

    fn object_id(&self) -> Result<ObjectId> {
        hash_envelope(&self.envelope()?)
    }
}

/// Prefix `content` with its `<type> <len>\0` header
pub fn wrap_envelope(object_type: ObjectType, content: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), content.len());

    let mut envelope = Vec::with_capacity(header.len() + content.len());
    envelope.extend_from_slice(header.as_bytes());
    envelope.extend_from_slice(content);

    Bytes::from(envelope)
}

/// SHA-1 of an already wrapped envelope
pub fn hash_envelope(envelope: &[u8]) -> Result<ObjectId> {
    let mut hasher = Sha1::new();
    hasher.update(envelope);

    let oid = hasher.finalize();
    ObjectId::try_parse(format!("{oid:x}"))
}

/// The object ID `content` would get when stored as an object of `object_type`
pub fn hash_object(object_type: ObjectType, content: &[u8]) -> Result<ObjectId> {
    hash_envelope(&wrap_envelope(object_type, content))
}
