//! Binary schema cache codec (§6 "Cache file").
//!
//! Little-endian, length-prefixed strings (32-bit unsigned length +
//! bytes). Layout: type count; for each type — name, builtin flag,
//! nocopy flag, extends name, alias-of name, method count, and for each
//! method — name, return type, shared flag, mapping-kind byte, mapping
//! value, parameter count, and for each parameter — type, name.

use std::io::{self, Read, Write};

use super::model::{MappingKind, MethodEntry, ParamEntry, SchemaType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed schema cache: {0}")]
    Malformed(String),
}

fn write_string<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    let bytes = s.as_bytes();
    w.write_all(&(bytes.len() as u32).to_le_bytes())?;
    w.write_all(bytes)
}

fn read_string<R: Read>(r: &mut R) -> Result<String, CacheError> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| CacheError::Malformed(e.to_string()))
}

fn write_opt_string<W: Write>(w: &mut W, s: &Option<String>) -> io::Result<()> {
    write_string(w, s.as_deref().unwrap_or(""))
}

fn read_opt_string<R: Read>(r: &mut R) -> Result<Option<String>, CacheError> {
    let s = read_string(r)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn write_bool<W: Write>(w: &mut W, b: bool) -> io::Result<()> {
    w.write_all(&[b as u8])
}

fn read_bool<R: Read>(r: &mut R) -> Result<bool, CacheError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0] != 0)
}

pub fn write_snapshot<W: Write>(w: &mut W, types: &[SchemaType]) -> io::Result<()> {
    w.write_all(&(types.len() as u32).to_le_bytes())?;
    for ty in types {
        write_string(w, &ty.name)?;
        write_bool(w, ty.builtin)?;
        write_bool(w, ty.nocopy)?;
        write_opt_string(w, &ty.extends)?;
        write_opt_string(w, &ty.alias_of)?;
        w.write_all(&(ty.methods.len() as u32).to_le_bytes())?;
        for method in &ty.methods {
            write_string(w, &method.name)?;
            write_string(w, &method.return_ty)?;
            write_bool(w, method.shared)?;
            w.write_all(&[method.mapping.discriminant()])?;
            write_string(w, method.mapping.value().unwrap_or(""))?;
            w.write_all(&(method.params.len() as u32).to_le_bytes())?;
            for param in &method.params {
                write_string(w, &param.ty)?;
                write_string(w, &param.name)?;
            }
        }
    }
    Ok(())
}

pub fn read_snapshot<R: Read>(r: &mut R) -> Result<Vec<SchemaType>, CacheError> {
    let mut u32_buf = [0u8; 4];
    r.read_exact(&mut u32_buf)?;
    let type_count = u32::from_le_bytes(u32_buf) as usize;
    let mut types = Vec::with_capacity(type_count);
    for _ in 0..type_count {
        let name = read_string(r)?;
        let builtin = read_bool(r)?;
        let nocopy = read_bool(r)?;
        let extends = read_opt_string(r)?;
        let alias_of = read_opt_string(r)?;

        r.read_exact(&mut u32_buf)?;
        let method_count = u32::from_le_bytes(u32_buf) as usize;
        let mut methods = Vec::with_capacity(method_count);
        for _ in 0..method_count {
            let mname = read_string(r)?;
            let return_ty = read_string(r)?;
            let shared = read_bool(r)?;
            let mut kind_buf = [0u8; 1];
            r.read_exact(&mut kind_buf)?;
            let mapping_value = read_string(r)?;
            let mapping = MappingKind::from_parts(kind_buf[0], mapping_value);

            r.read_exact(&mut u32_buf)?;
            let param_count = u32::from_le_bytes(u32_buf) as usize;
            let mut params = Vec::with_capacity(param_count);
            for _ in 0..param_count {
                let ty = read_string(r)?;
                let pname = read_string(r)?;
                params.push(ParamEntry { ty, name: pname });
            }

            methods.push(MethodEntry {
                name: mname,
                return_ty,
                shared,
                mapping,
                params,
            });
        }

        types.push(SchemaType {
            name,
            builtin,
            nocopy,
            extends,
            alias_of,
            methods,
        });
    }
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::MappingKind;

    fn sample() -> Vec<SchemaType> {
        let mut canvas = SchemaType::new("Canvas".into());
        canvas.builtin = true;
        canvas.nocopy = true;
        canvas.extends = Some("Resource".into());
        canvas.methods.push(MethodEntry {
            name: "create".into(),
            return_ty: "Canvas".into(),
            shared: true,
            mapping: MappingKind::Map("canvas::create".into()),
            params: vec![ParamEntry {
                ty: "int".into(),
                name: "width".into(),
            }],
        });
        vec![canvas]
    }

    #[test]
    fn round_trips_through_bytes() {
        let types = sample();
        let mut buf = Vec::new();
        write_snapshot(&mut buf, &types).unwrap();
        let back = read_snapshot(&mut &buf[..]).unwrap();
        assert_eq!(back, types);
    }

    #[test]
    fn truncated_buffer_is_reported_as_malformed() {
        let types = sample();
        let mut buf = Vec::new();
        write_snapshot(&mut buf, &types).unwrap();
        buf.truncate(buf.len() - 2);
        assert!(read_snapshot(&mut &buf[..]).is_err());
    }
}
