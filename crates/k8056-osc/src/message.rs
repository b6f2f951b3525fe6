/// A single OSC argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    /// `i`: 32-bit big-endian integer.
    Int(i32),
    /// `f`: 32-bit IEEE float.
    Float(f32),
    /// `s`: NUL-terminated, 4-byte padded string.
    String(String),
    /// `b`: length-prefixed, 4-byte padded byte blob.
    Blob(Vec<u8>),
    /// `h`: 64-bit big-endian integer.
    Long(i64),
    /// `d`: 64-bit IEEE double.
    Double(f64),
    /// `T`
    True,
    /// `F`
    False,
    /// `N`
    Nil,
    /// `I`
    Impulse,
}

impl OscArg {
    /// The type-tag character for this argument.
    pub fn type_tag(&self) -> char {
        match self {
            OscArg::Int(_) => 'i',
            OscArg::Float(_) => 'f',
            OscArg::String(_) => 's',
            OscArg::Blob(_) => 'b',
            OscArg::Long(_) => 'h',
            OscArg::Double(_) => 'd',
            OscArg::True => 'T',
            OscArg::False => 'F',
            OscArg::Nil => 'N',
            OscArg::Impulse => 'I',
        }
    }
}

impl From<i32> for OscArg {
    fn from(value: i32) -> Self {
        OscArg::Int(value)
    }
}

impl From<&str> for OscArg {
    fn from(value: &str) -> Self {
        OscArg::String(value.to_string())
    }
}

/// An OSC message: address pattern plus typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub path: String,
    pub args: Vec<OscArg>,
}

impl OscMessage {
    /// Create a message.
    pub fn new(path: impl Into<String>, args: Vec<OscArg>) -> Self {
        Self {
            path: path.into(),
            args,
        }
    }

    /// Type tags without the leading comma, e.g. `"ii"`.
    pub fn type_tags(&self) -> String {
        self.args.iter().map(OscArg::type_tag).collect()
    }
}

/// A bundle of packets sharing one NTP timetag.
#[derive(Debug, Clone, PartialEq)]
pub struct OscBundle {
    pub timetag: u64,
    pub content: Vec<OscPacket>,
}

/// Anything that can travel in one datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

impl OscPacket {
    /// Flatten into messages, depth-first in packet order.
    pub fn into_messages(self) -> Vec<OscMessage> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(self, out: &mut Vec<OscMessage>) {
        match self {
            OscPacket::Message(message) => out.push(message),
            OscPacket::Bundle(bundle) => {
                for packet in bundle.content {
                    packet.collect_into(out);
                }
            }
        }
    }
}

impl From<OscMessage> for OscPacket {
    fn from(message: OscMessage) -> Self {
        OscPacket::Message(message)
    }
}
