use crate::error::{Result, SurfaceError};
use crate::types::{ByteOrder, DecodedMap};
use crate::MapDecoder;
use ndarray::Array1;
use std::path::Path;

// FreeSurfer MGH layout: a 284-byte big-endian header, then the voxel/vertex
// payload. Only the geometry and type fields matter for flat surface maps.
const MGH_HEADER_LEN: usize = 284;
const MGH_VERSION: i32 = 1;

const MRI_UCHAR: i32 = 0;
const MRI_INT: i32 = 1;
const MRI_FLOAT: i32 = 3;
const MRI_SHORT: i32 = 4;

/// Decoder for FreeSurfer `.mgh` surface maps.
///
/// MGH files are big-endian on disk regardless of the producing machine, so
/// every value is swapped to native order during decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct MghDecoder;

impl MapDecoder for MghDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedMap> {
        let bytes = std::fs::read(path)?;
        decode_bytes(&bytes, path)
    }
}

fn decode_bytes(bytes: &[u8], path: &Path) -> Result<DecodedMap> {
    if bytes.len() < MGH_HEADER_LEN {
        return Err(SurfaceError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("header is {} bytes, need {}", bytes.len(), MGH_HEADER_LEN),
        });
    }

    let version = read_i32(bytes, 0);
    if version != MGH_VERSION {
        return Err(SurfaceError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("unknown MGH version {version}"),
        });
    }

    let dims = [
        read_i32(bytes, 4).max(0) as usize,
        read_i32(bytes, 8).max(0) as usize,
        read_i32(bytes, 12).max(0) as usize,
        read_i32(bytes, 16).max(1) as usize,
    ];
    let dtype = read_i32(bytes, 20);

    // Header dimensions are untrusted input; a corrupt file must fail with an
    // error, not an overflowing multiplication.
    let count = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| SurfaceError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("implausible dimensions {dims:?}"),
        })?;
    let elem = match dtype {
        MRI_UCHAR => 1,
        MRI_SHORT => 2,
        MRI_INT | MRI_FLOAT => 4,
        other => {
            return Err(SurfaceError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("unknown MGH data type {other}"),
            })
        }
    };

    let data = &bytes[MGH_HEADER_LEN..];
    let expected = count
        .checked_mul(elem)
        .ok_or_else(|| SurfaceError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: format!("implausible dimensions {dims:?}"),
        })?;
    if data.len() < expected {
        return Err(SurfaceError::Truncated {
            path: path.to_path_buf(),
            expected,
            found: data.len(),
        });
    }

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let off = i * elem;
        let v = match dtype {
            MRI_UCHAR => data[off] as f32,
            MRI_SHORT => i16::from_be_bytes([data[off], data[off + 1]]) as f32,
            MRI_INT => read_i32(data, off) as f32,
            MRI_FLOAT => f32::from_be_bytes([
                data[off],
                data[off + 1],
                data[off + 2],
                data[off + 3],
            ]),
            _ => unreachable!("dtype validated above"),
        };
        values.push(v);
    }

    log::debug!(
        "Decoded {} ({count} vertices, dtype {dtype})",
        path.display()
    );

    Ok(DecodedMap {
        values: Array1::from_vec(values),
        source_order: ByteOrder::Big,
    })
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Fixture helpers shared by the workspace's tests.
pub mod test_support {
    use super::{MGH_HEADER_LEN, MGH_VERSION, MRI_FLOAT};
    use std::path::Path;

    /// Write a minimal single-frame float MGH file holding `values`.
    pub fn write_mgh(path: &Path, values: &[f32]) -> std::io::Result<()> {
        let mut bytes = vec![0u8; MGH_HEADER_LEN];
        bytes[0..4].copy_from_slice(&MGH_VERSION.to_be_bytes());
        bytes[4..8].copy_from_slice(&(values.len() as i32).to_be_bytes());
        bytes[8..12].copy_from_slice(&1i32.to_be_bytes());
        bytes[12..16].copy_from_slice(&1i32.to_be_bytes());
        bytes[16..20].copy_from_slice(&1i32.to_be_bytes());
        bytes[20..24].copy_from_slice(&MRI_FLOAT.to_be_bytes());
        for v in values {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        std::fs::write(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::write_mgh;
    use super::*;
    use tempfile::TempDir;

    fn header(width: i32, dtype: i32) -> Vec<u8> {
        let mut bytes = vec![0u8; MGH_HEADER_LEN];
        bytes[0..4].copy_from_slice(&MGH_VERSION.to_be_bytes());
        bytes[4..8].copy_from_slice(&width.to_be_bytes());
        bytes[8..12].copy_from_slice(&1i32.to_be_bytes());
        bytes[12..16].copy_from_slice(&1i32.to_be_bytes());
        bytes[16..20].copy_from_slice(&1i32.to_be_bytes());
        bytes[20..24].copy_from_slice(&dtype.to_be_bytes());
        bytes
    }

    #[test]
    fn decodes_float_maps_to_native_order() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("lh.coef.mgh");
        write_mgh(&path, &[1.5, -2.25, 0.0]).expect("write");

        let map = MghDecoder.decode(&path).expect("decode");
        assert_eq!(map.values.len(), 3);
        assert_eq!(map.values[0], 1.5);
        assert_eq!(map.values[1], -2.25);
        assert_eq!(map.source_order, ByteOrder::Big);
    }

    #[test]
    fn decodes_int_and_short_and_uchar() {
        let mut int_bytes = header(2, MRI_INT);
        int_bytes.extend_from_slice(&3i32.to_be_bytes());
        int_bytes.extend_from_slice(&(-7i32).to_be_bytes());
        let map = decode_bytes(&int_bytes, Path::new("int.mgh")).expect("int");
        assert_eq!(map.values.to_vec(), vec![3.0, -7.0]);

        let mut short_bytes = header(2, MRI_SHORT);
        short_bytes.extend_from_slice(&300i16.to_be_bytes());
        short_bytes.extend_from_slice(&(-5i16).to_be_bytes());
        let map = decode_bytes(&short_bytes, Path::new("short.mgh")).expect("short");
        assert_eq!(map.values.to_vec(), vec![300.0, -5.0]);

        let mut uchar_bytes = header(2, MRI_UCHAR);
        uchar_bytes.extend_from_slice(&[0u8, 255u8]);
        let map = decode_bytes(&uchar_bytes, Path::new("uchar.mgh")).expect("uchar");
        assert_eq!(map.values.to_vec(), vec![0.0, 255.0]);
    }

    #[test]
    fn rejects_truncated_payload() {
        let mut bytes = header(4, MRI_FLOAT);
        bytes.extend_from_slice(&1.0f32.to_be_bytes());
        let err = decode_bytes(&bytes, Path::new("short.mgh")).unwrap_err();
        assert!(matches!(err, SurfaceError::Truncated { expected: 16, found: 4, .. }));
    }

    #[test]
    fn rejects_overflowing_header_dimensions() {
        // width * height * depth overflows usize.
        let mut bytes = header(i32::MAX, MRI_FLOAT);
        bytes[8..12].copy_from_slice(&i32::MAX.to_be_bytes());
        bytes[12..16].copy_from_slice(&i32::MAX.to_be_bytes());
        let err = decode_bytes(&bytes, Path::new("huge.mgh")).unwrap_err();
        assert!(matches!(err, SurfaceError::UnsupportedFormat { .. }));

        // Vertex count fits but the byte size (count * 4) does not.
        let mut bytes = header(i32::MAX, MRI_FLOAT);
        bytes[8..12].copy_from_slice(&i32::MAX.to_be_bytes());
        let err = decode_bytes(&bytes, Path::new("huge2.mgh")).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::UnsupportedFormat { .. } | SurfaceError::Truncated { .. }
        ));
    }

    #[test]
    fn rejects_unknown_version_and_dtype() {
        let mut bad_version = header(1, MRI_FLOAT);
        bad_version[0..4].copy_from_slice(&9i32.to_be_bytes());
        assert!(matches!(
            decode_bytes(&bad_version, Path::new("v9.mgh")),
            Err(SurfaceError::UnsupportedFormat { .. })
        ));

        let bad_dtype = header(0, 2);
        assert!(matches!(
            decode_bytes(&bad_dtype, Path::new("t2.mgh")),
            Err(SurfaceError::UnsupportedFormat { .. })
        ));
    }
}
