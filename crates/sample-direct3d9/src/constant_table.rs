//! Shader constant-table reflection.
//!
//! `D3DCompile` with a `vs_3_0`/`ps_3_0` target emits a legacy Direct3D9
//! DWORD token stream, and embeds the constant table as a comment block
//! tagged with the `CTAB` FourCC. Parsing it out lets transform matrices be
//! uploaded by parameter name instead of a hardcoded register index.

use thiserror::Error;

const CTAB_FOURCC: u32 = u32::from_le_bytes(*b"CTAB");

/// End-of-stream marker token.
const END_TOKEN: u32 = 0x0000_FFFF;
/// Low half of a comment token.
const COMMENT_OPCODE: u32 = 0x0000_FFFE;
/// Version token high halves for the two shader stages.
const VERTEX_STAGE: u32 = 0xFFFE_0000;
const PIXEL_STAGE: u32 = 0xFFFF_0000;

const HEADER_SIZE: usize = 28;
const CONSTANT_INFO_SIZE: usize = 20;

#[derive(Debug, Error)]
pub enum ConstantTableError {
    #[error("bytecode is empty")]
    Empty,
    #[error("token 0x{0:08X} is not a vertex or pixel shader version token")]
    NotAShader(u32),
    #[error("comment block at token {0} runs past the end of the bytecode")]
    CommentOutOfBounds(usize),
    #[error("bytecode has no CTAB comment block")]
    MissingTable,
    #[error("constant table data truncated at offset {0}")]
    Truncated(usize),
    #[error("string at offset {0} is not terminated")]
    UnterminatedString(usize),
    #[error("string at offset {0} is not valid UTF-8")]
    BadString(usize),
}

/// Which register file a constant binds to (`D3DXRS_*`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterSet {
    Bool,
    Int4,
    Float4,
    Sampler,
    Unknown(u16),
}

impl From<u16> for RegisterSet {
    fn from(raw: u16) -> Self {
        match raw {
            0 => Self::Bool,
            1 => Self::Int4,
            2 => Self::Float4,
            3 => Self::Sampler,
            other => Self::Unknown(other),
        }
    }
}

/// One named shader parameter and the registers it occupies.
#[derive(Clone, Debug)]
pub struct ShaderConstant {
    pub name: String,
    pub register_set: RegisterSet,
    pub register_index: u32,
    pub register_count: u32,
}

/// Name → register lookup for one compiled shader.
#[derive(Clone, Debug)]
pub struct ConstantTable {
    creator: String,
    target: String,
    constants: Vec<ShaderConstant>,
}

impl ConstantTable {
    /// Scans a D3D9 token stream for the `CTAB` comment and decodes it.
    pub fn parse(tokens: &[u32]) -> Result<Self, ConstantTableError> {
        let version = *tokens.first().ok_or(ConstantTableError::Empty)?;
        let stage = version & 0xFFFF_0000;
        if stage != VERTEX_STAGE && stage != PIXEL_STAGE {
            return Err(ConstantTableError::NotAShader(version));
        }

        let mut index = 1usize;
        while index < tokens.len() {
            let token = tokens[index];
            if token == END_TOKEN {
                break;
            }
            if (token & 0xFFFF) == COMMENT_OPCODE {
                // Comment length in dwords lives in bits 16..31.
                let length = ((token >> 16) & 0x7FFF) as usize;
                let payload = tokens
                    .get(index + 1..index + 1 + length)
                    .ok_or(ConstantTableError::CommentOutOfBounds(index))?;
                if payload.first() == Some(&CTAB_FOURCC) {
                    let bytes: Vec<u8> =
                        payload[1..].iter().flat_map(|t| t.to_le_bytes()).collect();
                    return Self::parse_table(&bytes);
                }
                index += 1 + length;
            } else {
                // Instruction token: operand count in bits 24..27.
                index += 1 + ((token >> 24) & 0xF) as usize;
            }
        }
        Err(ConstantTableError::MissingTable)
    }

    /// Decodes the `D3DXSHADER_CONSTANTTABLE` layout. All offsets are
    /// relative to the start of the table data, right after the FourCC.
    fn parse_table(data: &[u8]) -> Result<Self, ConstantTableError> {
        let _size = read_u32(data, 0)?;
        let creator_offset = read_u32(data, 4)? as usize;
        let _version = read_u32(data, 8)?;
        let constant_count = read_u32(data, 12)? as usize;
        let info_offset = read_u32(data, 16)? as usize;
        let _flags = read_u32(data, 20)?;
        let target_offset = read_u32(data, 24)? as usize;

        let creator = read_string(data, creator_offset)?;
        let target = read_string(data, target_offset)?;

        let mut constants = Vec::with_capacity(constant_count);
        for i in 0..constant_count {
            let record = info_offset + i * CONSTANT_INFO_SIZE;
            let name_offset = read_u32(data, record)? as usize;
            let register_set = read_u16(data, record + 4)?;
            let register_index = read_u16(data, record + 6)?;
            let register_count = read_u16(data, record + 8)?;
            // record + 10: reserved, record + 12: type info offset (unused here)

            constants.push(ShaderConstant {
                name: read_string(data, name_offset)?,
                register_set: register_set.into(),
                register_index: register_index.into(),
                register_count: register_count.into(),
            });
        }

        Ok(Self {
            creator,
            target,
            constants,
        })
    }

    /// Tool string the compiler recorded, e.g. the fxc version banner.
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// Shader target the table was built for, e.g. `vs_3_0`.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn constants(&self) -> &[ShaderConstant] {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<&ShaderConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// Register index of a named float4-register constant.
    pub fn float_register(&self, name: &str) -> Option<u32> {
        self.constant(name)
            .filter(|c| c.register_set == RegisterSet::Float4)
            .map(|c| c.register_index)
    }
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, ConstantTableError> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(ConstantTableError::Truncated(offset))?;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16, ConstantTableError> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or(ConstantTableError::Truncated(offset))?;
    Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_string(data: &[u8], offset: usize) -> Result<String, ConstantTableError> {
    let tail = data
        .get(offset..)
        .ok_or(ConstantTableError::Truncated(offset))?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(ConstantTableError::UnterminatedString(offset))?;
    std::str::from_utf8(&tail[..end])
        .map(str::to_owned)
        .map_err(|_| ConstantTableError::BadString(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS_3_0: u32 = 0xFFFE_0300;

    /// Builds the CTAB byte block for the given (name, set, index, count)
    /// constants, with the offsets laid out the way D3DX does: header,
    /// constant records, then the string pool.
    fn build_table(constants: &[(&str, u16, u16, u16)]) -> Vec<u8> {
        let strings_base = HEADER_SIZE + constants.len() * CONSTANT_INFO_SIZE;
        let mut strings: Vec<u8> = Vec::new();
        let intern = |s: &str, strings: &mut Vec<u8>| -> u32 {
            let offset = strings_base + strings.len();
            strings.extend_from_slice(s.as_bytes());
            strings.push(0);
            offset as u32
        };

        let mut records: Vec<u8> = Vec::new();
        let mut record_fields: Vec<(u32, u16, u16, u16)> = Vec::new();
        for &(name, set, index, count) in constants {
            let name_offset = intern(name, &mut strings);
            record_fields.push((name_offset, set, index, count));
        }
        let creator_offset = intern("unit test", &mut strings);
        let target_offset = intern("vs_3_0", &mut strings);

        for (name_offset, set, index, count) in record_fields {
            records.extend_from_slice(&name_offset.to_le_bytes());
            records.extend_from_slice(&set.to_le_bytes());
            records.extend_from_slice(&index.to_le_bytes());
            records.extend_from_slice(&count.to_le_bytes());
            records.extend_from_slice(&0u16.to_le_bytes()); // reserved
            records.extend_from_slice(&0u32.to_le_bytes()); // type info
            records.extend_from_slice(&0u32.to_le_bytes()); // default value
        }

        let mut data = Vec::new();
        data.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        data.extend_from_slice(&creator_offset.to_le_bytes());
        data.extend_from_slice(&VS_3_0.to_le_bytes());
        data.extend_from_slice(&(constants.len() as u32).to_le_bytes());
        data.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // flags
        data.extend_from_slice(&target_offset.to_le_bytes());
        data.extend_from_slice(&records);
        data.extend_from_slice(&strings);
        data
    }

    /// Wraps CTAB bytes into a full token stream: version, comment, end.
    fn build_bytecode(table: &[u8]) -> Vec<u32> {
        let mut padded = table.to_vec();
        while padded.len() % 4 != 0 {
            padded.push(0);
        }
        let payload_dwords = 1 + padded.len() / 4; // FourCC + data

        let mut tokens = vec![VS_3_0];
        tokens.push(COMMENT_OPCODE | ((payload_dwords as u32) << 16));
        tokens.push(CTAB_FOURCC);
        tokens.extend(
            padded
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes(c.try_into().unwrap())),
        );
        tokens.push(END_TOKEN);
        tokens
    }

    #[test]
    fn resolves_matrix_constants_by_name() {
        let table = build_table(&[
            ("mWorld", 2, 0, 4),
            ("mViewProjection", 2, 4, 4),
        ]);
        let parsed = ConstantTable::parse(&build_bytecode(&table)).unwrap();

        assert_eq!(parsed.creator(), "unit test");
        assert_eq!(parsed.target(), "vs_3_0");
        assert_eq!(parsed.constants().len(), 2);
        assert_eq!(parsed.float_register("mWorld"), Some(0));
        assert_eq!(parsed.float_register("mViewProjection"), Some(4));
        assert_eq!(parsed.constant("mWorld").unwrap().register_count, 4);
    }

    #[test]
    fn sampler_constants_are_not_float_registers() {
        let table = build_table(&[("diffuseSampler", 3, 0, 1)]);
        let parsed = ConstantTable::parse(&build_bytecode(&table)).unwrap();

        assert_eq!(parsed.float_register("diffuseSampler"), None);
        assert_eq!(
            parsed.constant("diffuseSampler").unwrap().register_set,
            RegisterSet::Sampler
        );
    }

    #[test]
    fn table_records_occupy_twenty_bytes_each() {
        // The string pool starts where the name offsets say it does, so the
        // last constant of a three-entry table only resolves if every record
        // carries its trailing default-value dword.
        let table = build_table(&[
            ("mWorld", 2, 0, 4),
            ("mViewProjection", 2, 4, 4),
            ("diffuseSampler", 3, 0, 1),
        ]);
        assert!(table.len() >= HEADER_SIZE + 3 * CONSTANT_INFO_SIZE);

        let parsed = ConstantTable::parse(&build_bytecode(&table)).unwrap();
        assert_eq!(parsed.constant("diffuseSampler").unwrap().register_index, 0);
        assert_eq!(parsed.float_register("mViewProjection"), Some(4));
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let table = build_table(&[("mWorld", 2, 0, 4)]);
        let parsed = ConstantTable::parse(&build_bytecode(&table)).unwrap();
        assert_eq!(parsed.float_register("mBones"), None);
    }

    #[test]
    fn stream_without_ctab_comment_is_rejected() {
        let tokens = [VS_3_0, END_TOKEN];
        assert!(matches!(
            ConstantTable::parse(&tokens),
            Err(ConstantTableError::MissingTable)
        ));
    }

    #[test]
    fn non_shader_streams_are_rejected() {
        let tokens = [0xDEAD_0300, END_TOKEN];
        assert!(matches!(
            ConstantTable::parse(&tokens),
            Err(ConstantTableError::NotAShader(_))
        ));
    }

    #[test]
    fn truncated_comment_is_rejected() {
        // Comment claims 8 dwords but the stream ends immediately.
        let tokens = [VS_3_0, COMMENT_OPCODE | (8 << 16)];
        assert!(matches!(
            ConstantTable::parse(&tokens),
            Err(ConstantTableError::CommentOutOfBounds(_))
        ));
    }

    #[test]
    fn truncated_table_data_is_rejected() {
        // A CTAB comment whose data stops mid-header.
        let tokens = [
            VS_3_0,
            COMMENT_OPCODE | (2 << 16),
            CTAB_FOURCC,
            28u32,
        ];
        assert!(matches!(
            ConstantTable::parse(&tokens),
            Err(ConstantTableError::Truncated(_))
        ));
    }

    #[test]
    fn instructions_before_the_comment_are_skipped() {
        let table = build_table(&[("mWorld", 2, 0, 4)]);
        let mut tokens = vec![VS_3_0];
        // A two-operand instruction (e.g. mov) that must be stepped over.
        tokens.push(0x0200_0001);
        tokens.push(0);
        tokens.push(0);
        tokens.extend_from_slice(&build_bytecode(&table)[1..]);

        let parsed = ConstantTable::parse(&tokens).unwrap();
        assert_eq!(parsed.float_register("mWorld"), Some(0));
    }
}
