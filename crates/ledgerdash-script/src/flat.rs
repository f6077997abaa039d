//! Flat codec for untyped Plutus programs.
//!
//! Only as much of the format is decoded as is needed to locate the program
//! body: the version triple, the bit range of the top-level term, and the
//! trailing filler. Parameter application then rewrites the program as
//! `(((body p1) p2) ... pn)` by emitting one `Apply` tag per parameter in
//! front of the untouched body bits, followed by each parameter as a `Data`
//! constant. The body itself is copied bit for bit, so applying zero
//! parameters reproduces the input exactly.

use std::ops::Range;

use crate::error::ScriptError;
use crate::plutus_data::PlutusData;

const TERM_TAG_BITS: u8 = 4;
const BUILTIN_TAG_BITS: u8 = 7;
const CONST_TAG_BITS: u8 = 4;

const TERM_VAR: u8 = 0;
const TERM_DELAY: u8 = 1;
const TERM_LAMBDA: u8 = 2;
const TERM_APPLY: u8 = 3;
const TERM_CONSTANT: u8 = 4;
const TERM_FORCE: u8 = 5;
const TERM_ERROR: u8 = 6;
const TERM_BUILTIN: u8 = 7;
const TERM_CONSTR: u8 = 8;
const TERM_CASE: u8 = 9;

const TYPE_INTEGER: u8 = 0;
const TYPE_BYTESTRING: u8 = 1;
const TYPE_STRING: u8 = 2;
const TYPE_UNIT: u8 = 3;
const TYPE_BOOL: u8 = 4;
const TYPE_LIST: u8 = 5;
const TYPE_PAIR: u8 = 6;
const TYPE_APPLY: u8 = 7;
const TYPE_DATA: u8 = 8;

/// Largest chunk in a flat byte string.
const MAX_CHUNK: usize = 255;

/// Program version triple, e.g. `1.1.0` for programs using constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A flat-encoded program with its top-level term located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatProgram {
    bytes: Vec<u8>,
    version: Version,
    term: Range<usize>,
}

impl FlatProgram {
    /// Decode the program structure from raw flat bytes.
    ///
    /// Fails unless the bytes hold exactly one version, one well-formed
    /// term, and the closing filler.
    pub fn parse(bytes: &[u8]) -> Result<Self, ScriptError> {
        let mut reader = BitReader::new(bytes);
        let version = Version {
            major: reader.read_word()?,
            minor: reader.read_word()?,
            patch: reader.read_word()?,
        };
        let start = reader.position();
        skip_term(&mut reader)?;
        let end = reader.position();
        reader.skip_filler()?;
        if reader.position() != bytes.len() * 8 {
            return Err(ScriptError::MalformedProgram(format!(
                "{} trailing bytes after program",
                bytes.len() - reader.position() / 8
            )));
        }
        Ok(FlatProgram {
            bytes: bytes.to_vec(),
            version,
            term: start..end,
        })
    }

    /// Version triple from the program header.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Bit range of the top-level term within the encoded bytes.
    pub fn term_bits(&self) -> Range<usize> {
        self.term.clone()
    }

    /// The flat-encoded program.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Apply `params` to the program body in order, returning new flat bytes.
    pub fn apply_data(&self, params: &[PlutusData]) -> Result<Vec<u8>, ScriptError> {
        let mut writer = BitWriter::with_capacity(self.bytes.len() + params.len() * 64);
        writer.write_word(self.version.major);
        writer.write_word(self.version.minor);
        writer.write_word(self.version.patch);
        for _ in params {
            writer.write_bits(TERM_TAG_BITS, TERM_APPLY);
        }
        writer.copy_bits(&self.bytes, self.term.clone());
        for param in params {
            writer.write_bits(TERM_TAG_BITS, TERM_CONSTANT);
            // type tag list: [data]
            writer.write_bit(true);
            writer.write_bits(CONST_TAG_BITS, TYPE_DATA);
            writer.write_bit(false);
            writer.write_bytestring(&param.to_cbor()?);
        }
        writer.write_filler();
        Ok(writer.finish())
    }
}

// ---------------------------------------------------------------------------
// Bit reader
// ---------------------------------------------------------------------------

struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        BitReader { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn eof() -> ScriptError {
        ScriptError::MalformedProgram("unexpected end of program".to_string())
    }

    fn read_bit(&mut self) -> Result<bool, ScriptError> {
        let byte = self.data.get(self.pos / 8).ok_or_else(Self::eof)?;
        let bit = (byte >> (7 - (self.pos % 8))) & 1;
        self.pos += 1;
        Ok(bit == 1)
    }

    fn read_bits(&mut self, n: u8) -> Result<u8, ScriptError> {
        let mut value = 0u8;
        for _ in 0..n {
            value = (value << 1) | u8::from(self.read_bit()?);
        }
        Ok(value)
    }

    fn read_word(&mut self) -> Result<u64, ScriptError> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let group = self.read_bits(8)?;
            if shift > 63 {
                return Err(ScriptError::MalformedProgram("word overflows 64 bits".to_string()));
            }
            value |= u64::from(group & 0x7f) << shift;
            if group & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    fn skip_filler(&mut self) -> Result<(), ScriptError> {
        while !self.read_bit()? {}
        if self.pos % 8 != 0 {
            return Err(ScriptError::MalformedProgram("filler does not end on a byte boundary".to_string()));
        }
        Ok(())
    }

    fn skip_integer(&mut self) -> Result<(), ScriptError> {
        while self.read_bits(8)? & 0x80 != 0 {}
        Ok(())
    }

    fn skip_bytestring(&mut self) -> Result<(), ScriptError> {
        self.skip_filler()?;
        loop {
            let len = usize::from(self.read_bits(8)?);
            if len == 0 {
                return Ok(());
            }
            let next = self.pos + len * 8;
            if next > self.data.len() * 8 {
                return Err(Self::eof());
            }
            self.pos = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Bit writer
// ---------------------------------------------------------------------------

struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    used: u8,
}

impl BitWriter {
    fn with_capacity(capacity: usize) -> Self {
        BitWriter {
            bytes: Vec::with_capacity(capacity),
            current: 0,
            used: 0,
        }
    }

    fn write_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | u8::from(bit);
        self.used += 1;
        if self.used == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.used = 0;
        }
    }

    fn write_bits(&mut self, n: u8, value: u8) {
        for k in (0..n).rev() {
            self.write_bit((value >> k) & 1 == 1);
        }
    }

    fn write_byte(&mut self, value: u8) {
        if self.used == 0 {
            self.bytes.push(value);
        } else {
            self.write_bits(8, value);
        }
    }

    fn write_word(&mut self, mut value: u64) {
        loop {
            let mut group = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                group |= 0x80;
            }
            self.write_byte(group);
            if value == 0 {
                break;
            }
        }
    }

    fn write_filler(&mut self) {
        while self.used != 7 {
            self.write_bit(false);
        }
        self.write_bit(true);
    }

    fn write_bytestring(&mut self, data: &[u8]) {
        self.write_filler();
        for chunk in data.chunks(MAX_CHUNK) {
            self.write_byte(chunk.len() as u8);
            self.bytes.extend_from_slice(chunk);
        }
        self.write_byte(0);
    }

    fn copy_bits(&mut self, source: &[u8], range: Range<usize>) {
        for pos in range {
            let bit = (source[pos / 8] >> (7 - (pos % 8))) & 1;
            self.write_bit(bit == 1);
        }
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

// ---------------------------------------------------------------------------
// Term and constant skipping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConstantType {
    Integer,
    ByteString,
    String,
    Unit,
    Bool,
    Data,
    List(Box<ConstantType>),
    Pair(Box<ConstantType>, Box<ConstantType>),
}

fn parse_type(tags: &[u8], idx: &mut usize) -> Result<ConstantType, ScriptError> {
    let next = |idx: &mut usize| -> Result<u8, ScriptError> {
        let tag = tags
            .get(*idx)
            .copied()
            .ok_or_else(|| ScriptError::MalformedProgram("truncated constant type".to_string()))?;
        *idx += 1;
        Ok(tag)
    };
    match next(idx)? {
        TYPE_INTEGER => Ok(ConstantType::Integer),
        TYPE_BYTESTRING => Ok(ConstantType::ByteString),
        TYPE_STRING => Ok(ConstantType::String),
        TYPE_UNIT => Ok(ConstantType::Unit),
        TYPE_BOOL => Ok(ConstantType::Bool),
        TYPE_DATA => Ok(ConstantType::Data),
        TYPE_APPLY => match next(idx)? {
            TYPE_LIST => Ok(ConstantType::List(Box::new(parse_type(tags, idx)?))),
            TYPE_APPLY => match next(idx)? {
                TYPE_PAIR => {
                    let first = parse_type(tags, idx)?;
                    let second = parse_type(tags, idx)?;
                    Ok(ConstantType::Pair(Box::new(first), Box::new(second)))
                }
                other => Err(ScriptError::UnsupportedConstantType(other)),
            },
            other => Err(ScriptError::UnsupportedConstantType(other)),
        },
        other => Err(ScriptError::UnsupportedConstantType(other)),
    }
}

fn skip_constant_value(reader: &mut BitReader<'_>, ty: &ConstantType) -> Result<(), ScriptError> {
    match ty {
        ConstantType::Integer => reader.skip_integer(),
        ConstantType::ByteString | ConstantType::String | ConstantType::Data => reader.skip_bytestring(),
        ConstantType::Unit => Ok(()),
        ConstantType::Bool => reader.read_bit().map(|_| ()),
        ConstantType::List(item) => {
            while reader.read_bit()? {
                skip_constant_value(reader, item)?;
            }
            Ok(())
        }
        ConstantType::Pair(first, second) => {
            skip_constant_value(reader, first)?;
            skip_constant_value(reader, second)
        }
    }
}

fn skip_constant(reader: &mut BitReader<'_>) -> Result<(), ScriptError> {
    let mut tags = Vec::new();
    while reader.read_bit()? {
        tags.push(reader.read_bits(CONST_TAG_BITS)?);
    }
    let mut idx = 0;
    let ty = parse_type(&tags, &mut idx)?;
    if idx != tags.len() {
        return Err(ScriptError::MalformedProgram("unused constant type tags".to_string()));
    }
    skip_constant_value(reader, &ty)
}

enum Pending {
    Term,
    /// Remaining elements of a term list, each preceded by a continuation bit.
    TermList,
}

/// Advance past one term. Iterative so deeply nested programs cannot
/// exhaust the stack.
fn skip_term(reader: &mut BitReader<'_>) -> Result<(), ScriptError> {
    let mut stack = vec![Pending::Term];
    while let Some(pending) = stack.pop() {
        match pending {
            Pending::TermList => {
                if reader.read_bit()? {
                    stack.push(Pending::TermList);
                    stack.push(Pending::Term);
                }
            }
            Pending::Term => match reader.read_bits(TERM_TAG_BITS)? {
                TERM_VAR => {
                    reader.read_word()?;
                }
                TERM_DELAY | TERM_LAMBDA | TERM_FORCE => stack.push(Pending::Term),
                TERM_APPLY => {
                    stack.push(Pending::Term);
                    stack.push(Pending::Term);
                }
                TERM_CONSTANT => skip_constant(reader)?,
                TERM_ERROR => {}
                TERM_BUILTIN => {
                    reader.read_bits(BUILTIN_TAG_BITS)?;
                }
                TERM_CONSTR => {
                    reader.read_word()?;
                    stack.push(Pending::TermList);
                }
                TERM_CASE => {
                    stack.push(Pending::TermList);
                    stack.push(Pending::Term);
                }
                other => return Err(ScriptError::UnsupportedTerm(other)),
            },
        }
    }
    Ok(())
}
