use bytes::{Buf, BufMut, BytesMut};

use crate::error::{OscError, Result};
use crate::message::{OscArg, OscBundle, OscMessage, OscPacket};

/// Bundle header string, NUL-padded to 8 bytes.
const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Bundles nested deeper than this are rejected.
const MAX_BUNDLE_DEPTH: usize = 8;

/// Encode a single message.
///
/// Wire format:
/// ```text
/// ┌───────────────────┬────────────────────┬──────────────────┐
/// │ Address pattern   │ Type tags          │ Arguments        │
/// │ "/k8056/set\0\0"  │ ",ii\0"            │ big-endian, each │
/// │ (padded to 4B)    │ (padded to 4B)     │ 4B aligned       │
/// └───────────────────┴────────────────────┴──────────────────┘
/// ```
pub fn encode_message(message: &OscMessage, dst: &mut BytesMut) -> Result<()> {
    if !message.path.starts_with('/') {
        return Err(OscError::InvalidAddress(message.path.clone()));
    }

    put_padded_str(message.path.as_bytes(), dst);

    let mut tags = String::with_capacity(message.args.len() + 1);
    tags.push(',');
    tags.push_str(&message.type_tags());
    put_padded_str(tags.as_bytes(), dst);

    for arg in &message.args {
        match arg {
            OscArg::Int(v) => dst.put_i32(*v),
            OscArg::Float(v) => dst.put_f32(*v),
            OscArg::String(v) => put_padded_str(v.as_bytes(), dst),
            OscArg::Blob(v) => {
                let len = u32::try_from(v.len())
                    .map_err(|_| OscError::Malformed("blob longer than u32::MAX".to_string()))?;
                dst.put_u32(len);
                dst.put_slice(v);
                dst.put_bytes(0, pad_len(v.len()));
            }
            OscArg::Long(v) => dst.put_i64(*v),
            OscArg::Double(v) => dst.put_f64(*v),
            OscArg::True | OscArg::False | OscArg::Nil | OscArg::Impulse => {}
        }
    }
    Ok(())
}

/// Encode a message or bundle.
pub fn encode_packet(packet: &OscPacket, dst: &mut BytesMut) -> Result<()> {
    match packet {
        OscPacket::Message(message) => encode_message(message, dst),
        OscPacket::Bundle(bundle) => {
            dst.put_slice(BUNDLE_TAG);
            dst.put_u64(bundle.timetag);
            for element in &bundle.content {
                let mut inner = BytesMut::new();
                encode_packet(element, &mut inner)?;
                let len = u32::try_from(inner.len())
                    .map_err(|_| OscError::Malformed("bundle element too large".to_string()))?;
                dst.put_u32(len);
                dst.put_slice(&inner);
            }
            Ok(())
        }
    }
}

/// Decode one datagram into a packet.
pub fn decode_packet(datagram: &[u8]) -> Result<OscPacket> {
    decode_at_depth(datagram, 0)
}

fn decode_at_depth(datagram: &[u8], depth: usize) -> Result<OscPacket> {
    if datagram.is_empty() {
        return Err(OscError::Truncated);
    }
    if datagram.len() % 4 != 0 {
        return Err(OscError::Malformed(format!(
            "packet size {} is not a multiple of 4",
            datagram.len()
        )));
    }

    if datagram.starts_with(BUNDLE_TAG) {
        if depth >= MAX_BUNDLE_DEPTH {
            return Err(OscError::Malformed("bundle nesting too deep".to_string()));
        }
        return decode_bundle(&datagram[BUNDLE_TAG.len()..], depth).map(OscPacket::Bundle);
    }

    decode_message(datagram).map(OscPacket::Message)
}

fn decode_bundle(mut src: &[u8], depth: usize) -> Result<OscBundle> {
    need(src, 8)?;
    let timetag = src.get_u64();

    let mut content = Vec::new();
    while src.has_remaining() {
        need(src, 4)?;
        let size = src.get_u32() as usize;
        need(src, size)?;
        content.push(decode_at_depth(&src[..size], depth + 1)?);
        src.advance(size);
    }
    Ok(OscBundle { timetag, content })
}

fn decode_message(mut src: &[u8]) -> Result<OscMessage> {
    let path = get_padded_str(&mut src)?;
    if !path.starts_with('/') {
        return Err(OscError::InvalidAddress(path));
    }

    // Type tags are optional in very old senders; treat absence as no args.
    if !src.has_remaining() {
        return Ok(OscMessage::new(path, Vec::new()));
    }

    let tags = get_padded_str(&mut src)?;
    let Some(tags) = tags.strip_prefix(',') else {
        return Err(OscError::Malformed(format!(
            "type tag string {tags:?} does not start with ','"
        )));
    };

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        let arg = match tag {
            'i' => {
                need(src, 4)?;
                OscArg::Int(src.get_i32())
            }
            'f' => {
                need(src, 4)?;
                OscArg::Float(src.get_f32())
            }
            's' => OscArg::String(get_padded_str(&mut src)?),
            'b' => {
                need(src, 4)?;
                let len = src.get_u32() as usize;
                let padded = len + pad_len(len);
                need(src, padded)?;
                let blob = src[..len].to_vec();
                src.advance(padded);
                OscArg::Blob(blob)
            }
            'h' => {
                need(src, 8)?;
                OscArg::Long(src.get_i64())
            }
            'd' => {
                need(src, 8)?;
                OscArg::Double(src.get_f64())
            }
            'T' => OscArg::True,
            'F' => OscArg::False,
            'N' => OscArg::Nil,
            'I' => OscArg::Impulse,
            other => return Err(OscError::UnsupportedTag(other)),
        };
        args.push(arg);
    }

    Ok(OscMessage::new(path, args))
}

fn need(src: &[u8], len: usize) -> Result<()> {
    if src.len() < len {
        return Err(OscError::Truncated);
    }
    Ok(())
}

/// Zero bytes needed after `len` bytes to reach a 4-byte boundary.
fn pad_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

fn put_padded_str(s: &[u8], dst: &mut BytesMut) {
    dst.put_slice(s);
    // At least one NUL terminator, then pad to 4.
    dst.put_bytes(0, 4 - s.len() % 4);
}

fn get_padded_str(src: &mut &[u8]) -> Result<String> {
    let Some(nul) = src.iter().position(|b| *b == 0) else {
        return Err(OscError::Truncated);
    };
    let padded = nul + 1 + pad_len(nul + 1);
    need(src, padded)?;
    let s = std::str::from_utf8(&src[..nul])
        .map_err(|_| OscError::Malformed("string is not valid UTF-8".to_string()))?
        .to_string();
    src.advance(padded);
    Ok(s)
}
