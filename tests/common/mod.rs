//! FBX binary fixture writer for tests.
#![allow(dead_code)]

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;

pub const MAGIC: &[u8] = b"Kaydara FBX Binary  \x00\x1a\x00";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Property value to write.
#[derive(Debug, Clone)]
pub enum Value {
    I16(i16),
    /// Raw byte of a boolean.
    Bool(u8),
    I32(i32),
    F32(f32),
    F64(f64),
    I64(i64),
    Str(Vec<u8>),
    Raw(Vec<u8>),
    /// Raw bytes of a boolean array, and whether to compress.
    VecBool(Vec<u8>, bool),
    VecI32(Vec<i32>, bool),
    VecI64(Vec<i64>, bool),
    VecF32(Vec<f32>, bool),
    VecF64(Vec<f64>, bool),
    /// Unknown type code followed by the given payload.
    Unknown(u8, Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct FixtureNode {
    pub name: Vec<u8>,
    pub props: Vec<Value>,
    pub children: Vec<FixtureNode>,
}

pub fn node(name: &[u8], props: Vec<Value>, children: Vec<FixtureNode>) -> FixtureNode {
    FixtureNode {
        name: name.to_vec(),
        props: props,
        children: children,
    }
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn write_array(out: &mut Vec<u8>, code: u8, count: usize, raw: Vec<u8>, compress: bool) {
    out.push(code);
    out.write_u32::<LittleEndian>(count as u32).unwrap();
    let payload = if compress { zlib(&raw) } else { raw };
    out.write_u32::<LittleEndian>(if compress { 1 } else { 0 }).unwrap();
    out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
    out.extend_from_slice(&payload);
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match *value {
        Value::I16(v) => {
            out.push(b'Y');
            out.write_i16::<LittleEndian>(v).unwrap();
        },
        Value::Bool(v) => {
            out.push(b'C');
            out.push(v);
        },
        Value::I32(v) => {
            out.push(b'I');
            out.write_i32::<LittleEndian>(v).unwrap();
        },
        Value::F32(v) => {
            out.push(b'F');
            out.write_f32::<LittleEndian>(v).unwrap();
        },
        Value::F64(v) => {
            out.push(b'D');
            out.write_f64::<LittleEndian>(v).unwrap();
        },
        Value::I64(v) => {
            out.push(b'L');
            out.write_i64::<LittleEndian>(v).unwrap();
        },
        Value::Str(ref v) | Value::Raw(ref v) => {
            out.push(if let Value::Str(_) = *value { b'S' } else { b'R' });
            out.write_u32::<LittleEndian>(v.len() as u32).unwrap();
            out.extend_from_slice(v);
        },
        Value::VecBool(ref v, compress) => write_array(out, b'b', v.len(), v.clone(), compress),
        Value::VecI32(ref v, compress) => {
            let mut raw = Vec::new();
            for x in v {
                raw.write_i32::<LittleEndian>(*x).unwrap();
            }
            write_array(out, b'i', v.len(), raw, compress);
        },
        Value::VecI64(ref v, compress) => {
            let mut raw = Vec::new();
            for x in v {
                raw.write_i64::<LittleEndian>(*x).unwrap();
            }
            write_array(out, b'l', v.len(), raw, compress);
        },
        Value::VecF32(ref v, compress) => {
            let mut raw = Vec::new();
            for x in v {
                raw.write_f32::<LittleEndian>(*x).unwrap();
            }
            write_array(out, b'f', v.len(), raw, compress);
        },
        Value::VecF64(ref v, compress) => {
            let mut raw = Vec::new();
            for x in v {
                raw.write_f64::<LittleEndian>(*x).unwrap();
            }
            write_array(out, b'd', v.len(), raw, compress);
        },
        Value::Unknown(code, ref payload) => {
            out.push(code);
            out.extend_from_slice(payload);
        },
    }
}

fn write_header_fields(out: &mut Vec<u8>, wide: bool, end_offset: u64, num_props: u64, prop_len: u64, name_len: u8) {
    if wide {
        out.write_u64::<LittleEndian>(end_offset).unwrap();
        out.write_u64::<LittleEndian>(num_props).unwrap();
        out.write_u64::<LittleEndian>(prop_len).unwrap();
    } else {
        out.write_u32::<LittleEndian>(end_offset as u32).unwrap();
        out.write_u32::<LittleEndian>(num_props as u32).unwrap();
        out.write_u32::<LittleEndian>(prop_len as u32).unwrap();
    }
    out.push(name_len);
}

fn null_record(out: &mut Vec<u8>, wide: bool) {
    write_header_fields(out, wide, 0, 0, 0, 0);
}

fn write_node(out: &mut Vec<u8>, wide: bool, fixture: &FixtureNode) {
    let header_pos = out.len();
    write_header_fields(out, wide, 0, 0, 0, 0);
    out.extend_from_slice(&fixture.name);

    let props_start = out.len();
    for value in &fixture.props {
        write_value(out, value);
    }
    let prop_len = (out.len() - props_start) as u64;

    if !fixture.children.is_empty() || fixture.props.is_empty() {
        for child in &fixture.children {
            write_node(out, wide, child);
        }
        null_record(out, wide);
    }

    let mut header = Vec::new();
    write_header_fields(&mut header, wide, out.len() as u64, fixture.props.len() as u64, prop_len, fixture.name.len() as u8);
    out[header_pos..header_pos + header.len()].copy_from_slice(&header);
}

/// Writes a complete FBX binary file.
pub fn write_document(version: u32, roots: &[FixtureNode]) -> Vec<u8> {
    let wide = version >= 7500;
    let mut out = MAGIC.to_vec();
    out.write_u32::<LittleEndian>(version).unwrap();
    for fixture in roots {
        write_node(&mut out, wide, fixture);
    }
    null_record(&mut out, wide);
    // Footer; its contents are never read.
    out.extend_from_slice(&[0xfa, 0xbc, 0xab, 0x09, 0xd0, 0xc8, 0xd4, 0x66]);
    out.extend_from_slice(&[0; 16]);
    out
}

/// Vertices of a unit cube, 8 corners.
pub fn cube_vertices() -> Vec<f64> {
    let mut v = Vec::new();
    for i in 0..8 {
        v.push(if i & 1 == 0 { -1.0 } else { 1.0 });
        v.push(if i & 2 == 0 { -1.0 } else { 1.0 });
        v.push(if i & 4 == 0 { -1.0 } else { 1.0 });
    }
    v
}

/// Quad faces of the cube; the last index of each polygon is bit-negated.
pub fn cube_indices() -> Vec<i32> {
    let faces = [
        [0, 1, 3, 2], [4, 6, 7, 5], [0, 4, 5, 1],
        [2, 3, 7, 6], [0, 2, 6, 4], [1, 5, 7, 3],
    ];
    let mut indices = Vec::new();
    for face in faces.iter() {
        indices.extend_from_slice(&face[..3]);
        indices.push(!face[3]);
    }
    indices
}

pub fn cube_normals() -> Vec<f64> {
    let normals = [
        [0.0, 0.0, -1.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0],
        [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
    ];
    let mut out = Vec::new();
    for n in normals.iter() {
        for _ in 0..4 {
            out.extend_from_slice(n);
        }
    }
    out
}

/// A small scene laid out like the export of a dice model.
pub fn dice_scene(compress: bool) -> Vec<FixtureNode> {
    vec![
        node(b"FBXHeaderExtension", vec![], vec![
            node(b"FBXHeaderVersion", vec![Value::I32(1003)], vec![]),
            node(b"FBXVersion", vec![Value::I32(7400)], vec![]),
            node(b"Creator", vec![Value::Str(b"fbx-tree tests".to_vec())], vec![]),
        ]),
        node(b"GlobalSettings", vec![], vec![
            node(b"Version", vec![Value::I32(1000)], vec![]),
            node(b"Properties70", vec![], vec![
                node(b"P", vec![
                    Value::Str(b"UpAxis".to_vec()),
                    Value::Str(b"int".to_vec()),
                    Value::Str(b"Integer".to_vec()),
                    Value::Str(Vec::new()),
                    Value::I32(1),
                ], vec![]),
            ]),
        ]),
        node(b"Objects", vec![], vec![
            node(b"Geometry", vec![
                Value::I64(140_000_001),
                Value::Str(b"Dice\x00\x01Geometry".to_vec()),
                Value::Str(b"Mesh".to_vec()),
            ], vec![
                node(b"Vertices", vec![Value::VecF64(cube_vertices(), compress)], vec![]),
                node(b"PolygonVertexIndex", vec![Value::VecI32(cube_indices(), compress)], vec![]),
                node(b"GeometryVersion", vec![Value::I32(124)], vec![]),
                node(b"LayerElementNormal", vec![Value::I32(0)], vec![
                    node(b"Version", vec![Value::I32(102)], vec![]),
                    node(b"Name", vec![Value::Str(Vec::new())], vec![]),
                    node(b"MappingInformationType", vec![Value::Str(b"ByPolygonVertex".to_vec())], vec![]),
                    node(b"Normals", vec![Value::VecF64(cube_normals(), compress)], vec![]),
                ]),
            ]),
            node(b"Model", vec![
                Value::I64(140_000_002),
                Value::Str(b"Dice\x00\x01Model".to_vec()),
                Value::Str(b"Mesh".to_vec()),
            ], vec![
                node(b"Version", vec![Value::I32(232)], vec![]),
                node(b"Shading", vec![Value::Bool(b'T')], vec![]),
                node(b"Culling", vec![Value::Str(b"CullingOff".to_vec())], vec![]),
            ]),
        ]),
        node(b"Connections", vec![], vec![
            node(b"C", vec![Value::Str(b"OO".to_vec()), Value::I64(140_000_001), Value::I64(140_000_002)], vec![]),
            node(b"C", vec![Value::Str(b"OO".to_vec()), Value::I64(140_000_002), Value::I64(0)], vec![]),
        ]),
    ]
}
