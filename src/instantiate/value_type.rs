//! Engine value types
//!
//! Packed as `[type_tag, ...components]`:
//!
//! | tag | type  | components                         |
//! |-----|-------|------------------------------------|
//! | 0   | Vec2  | x, y                               |
//! | 1   | Vec3  | x, y, z                            |
//! | 2   | Vec4  | x, y, z, w                         |
//! | 3   | Quat  | x, y, z, w                         |
//! | 4   | Color | packed ARGB, or r, g, b[, a]       |
//! | 5   | Size  | width, height                      |
//! | 6   | Rect  | x, y, width, height                |
//! | 7   | Mat4  | up to 16 values, row major         |

use std::fmt;

use serde::Serialize;

use crate::pool::ResolvedValue;
use crate::registry::FieldKind;

/// A decoded engine value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineValue {
    Vec2 { x: f64, y: f64 },
    Vec3 { x: f64, y: f64, z: f64 },
    Vec4 { x: f64, y: f64, z: f64, w: f64 },
    Quat { x: f64, y: f64, z: f64, w: f64 },
    Color { r: u8, g: u8, b: u8, a: u8 },
    Size { width: f64, height: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Mat4 { m: [f64; 16] },
}

impl EngineValue {
    /// Opaque white, used when a color carries no usable components
    pub const WHITE: EngineValue = EngineValue::Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub fn kind(&self) -> FieldKind {
        match self {
            EngineValue::Vec2 { .. } => FieldKind::Vec2,
            EngineValue::Vec3 { .. } => FieldKind::Vec3,
            EngineValue::Vec4 { .. } => FieldKind::Vec4,
            EngineValue::Quat { .. } => FieldKind::Quat,
            EngineValue::Color { .. } => FieldKind::Color,
            EngineValue::Size { .. } => FieldKind::Size,
            EngineValue::Rect { .. } => FieldKind::Rect,
            EngineValue::Mat4 { .. } => FieldKind::Mat4,
        }
    }
}

/// Decodes a packed value array for an engine value kind.
///
/// Returns `None` when `kind` is not an engine value kind, the value is not
/// an array, the tag does not match, or a component is not a number.
pub fn decode_engine_value(kind: FieldKind, value: &ResolvedValue) -> Option<EngineValue> {
    let tag = kind.value_type_tag()?;
    let items = value.as_array()?;
    let (head, rest) = items.split_first()?;
    if head.as_index() != Some(tag as usize) {
        return None;
    }

    let comps = rest
        .iter()
        .map(|item| item.as_f64())
        .collect::<Option<Vec<f64>>>()?;

    let decoded = match kind {
        FieldKind::Vec2 => {
            let [x, y] = take::<2>(&comps)?;
            EngineValue::Vec2 { x, y }
        }
        FieldKind::Vec3 => {
            let [x, y, z] = take::<3>(&comps)?;
            EngineValue::Vec3 { x, y, z }
        }
        FieldKind::Vec4 => {
            let [x, y, z, w] = take::<4>(&comps)?;
            EngineValue::Vec4 { x, y, z, w }
        }
        FieldKind::Quat => {
            let [x, y, z, w] = take::<4>(&comps)?;
            EngineValue::Quat { x, y, z, w }
        }
        FieldKind::Color => decode_color(&comps),
        FieldKind::Size => {
            let [width, height] = take::<2>(&comps)?;
            EngineValue::Size { width, height }
        }
        FieldKind::Rect => {
            let [x, y, width, height] = take::<4>(&comps)?;
            EngineValue::Rect {
                x,
                y,
                width,
                height,
            }
        }
        FieldKind::Mat4 => {
            // Short matrices are zero padded.
            let mut m = [0.0; 16];
            for (slot, value) in m.iter_mut().zip(comps.iter()) {
                *slot = *value;
            }
            EngineValue::Mat4 { m }
        }
        _ => return None,
    };
    Some(decoded)
}

fn take<const N: usize>(comps: &[f64]) -> Option<[f64; N]> {
    comps.get(..N)?.try_into().ok()
}

fn decode_color(comps: &[f64]) -> EngineValue {
    match comps {
        [packed] if packed.fract() == 0.0 && *packed >= 0.0 && *packed <= u32::MAX as f64 => {
            let packed = *packed as u32;
            EngineValue::Color {
                a: ((packed >> 24) & 0xFF) as u8,
                r: ((packed >> 16) & 0xFF) as u8,
                g: ((packed >> 8) & 0xFF) as u8,
                b: (packed & 0xFF) as u8,
            }
        }
        [r, g, b, a] => EngineValue::Color {
            r: channel(*r),
            g: channel(*g),
            b: channel(*b),
            a: channel(*a),
        },
        [r, g, b] => EngineValue::Color {
            r: channel(*r),
            g: channel(*g),
            b: channel(*b),
            a: 255,
        },
        _ => EngineValue::WHITE,
    }
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

impl fmt::Display for EngineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineValue::Vec2 { x, y } => write!(f, "({},{})", x, y),
            EngineValue::Vec3 { x, y, z } => write!(f, "({},{},{})", x, y, z),
            EngineValue::Vec4 { x, y, z, w } => write!(f, "({},{},{},{})", x, y, z, w),
            EngineValue::Quat { x, y, z, w } => write!(f, "quat({},{},{},{})", x, y, z, w),
            EngineValue::Color { r, g, b, a } => write!(f, "rgba({},{},{},{})", r, g, b, a),
            EngineValue::Size { width, height } => write!(f, "({}×{})", width, height),
            EngineValue::Rect {
                x,
                y,
                width,
                height,
            } => write!(f, "rect({},{},{},{})", x, y, width, height),
            EngineValue::Mat4 { m } => {
                write!(f, "mat4([")?;
                for (row, chunk) in m.chunks(4).enumerate() {
                    if row > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{},{},{},{}", chunk[0], chunk[1], chunk[2], chunk[3])?;
                }
                write!(f, "])")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn packed(values: &[f64]) -> ResolvedValue {
        ResolvedValue::Array(
            values
                .iter()
                .map(|v| Arc::new(ResolvedValue::Number(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_vec2() {
        let value = decode_engine_value(FieldKind::Vec2, &packed(&[0.0, 0.5, 1.0])).unwrap();
        assert_eq!(value, EngineValue::Vec2 { x: 0.5, y: 1.0 });
        assert_eq!(value.to_string(), "(0.5,1)");
    }

    #[test]
    fn test_wrong_tag_rejected() {
        assert!(decode_engine_value(FieldKind::Vec3, &packed(&[0.0, 1.0, 2.0])).is_none());
    }

    #[test]
    fn test_missing_components_rejected() {
        assert!(decode_engine_value(FieldKind::Rect, &packed(&[6.0, 1.0, 2.0])).is_none());
    }

    #[test]
    fn test_non_numeric_component_rejected() {
        let value = ResolvedValue::Array(vec![
            Arc::new(ResolvedValue::Number(5.0)),
            Arc::new(ResolvedValue::String("wide".into())),
            Arc::new(ResolvedValue::Number(10.0)),
        ]);
        assert!(decode_engine_value(FieldKind::Size, &value).is_none());
    }

    #[test]
    fn test_non_value_kind() {
        assert!(decode_engine_value(FieldKind::Number, &packed(&[0.0, 1.0, 2.0])).is_none());
    }

    #[test]
    fn test_packed_argb_color() {
        let value = decode_engine_value(FieldKind::Color, &packed(&[4.0, 4286611711.0])).unwrap();
        // 0xFF8080FF
        assert_eq!(
            value,
            EngineValue::Color {
                r: 128,
                g: 128,
                b: 255,
                a: 255
            }
        );
        assert_eq!(value.to_string(), "rgba(128,128,255,255)");
    }

    #[test]
    fn test_rgb_color_has_full_alpha() {
        let value = decode_engine_value(FieldKind::Color, &packed(&[4.0, 10.0, 20.0, 30.0])).unwrap();
        assert_eq!(
            value,
            EngineValue::Color {
                r: 10,
                g: 20,
                b: 30,
                a: 255
            }
        );
    }

    #[test]
    fn test_rgba_color() {
        let value =
            decode_engine_value(FieldKind::Color, &packed(&[4.0, 1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(value.to_string(), "rgba(1,2,3,4)");
    }

    #[test]
    fn test_empty_color_is_white() {
        let value = decode_engine_value(FieldKind::Color, &packed(&[4.0])).unwrap();
        assert_eq!(value, EngineValue::WHITE);
    }

    #[test]
    fn test_size_display() {
        let value = decode_engine_value(FieldKind::Size, &packed(&[5.0, 100.0, 50.0])).unwrap();
        assert_eq!(value.to_string(), "(100×50)");
    }

    #[test]
    fn test_short_mat4_is_padded() {
        let value = decode_engine_value(FieldKind::Mat4, &packed(&[7.0, 1.0, 2.0])).unwrap();
        match value {
            EngineValue::Mat4 { m } => {
                assert_eq!(m[0], 1.0);
                assert_eq!(m[1], 2.0);
                assert!(m[2..].iter().all(|v| *v == 0.0));
            }
            other => panic!("expected mat4, got {:?}", other),
        }
        assert!(value.to_string().starts_with("mat4([1,2,0,0|0,0,0,0|"));
    }

    #[test]
    fn test_quat_display() {
        let value =
            decode_engine_value(FieldKind::Quat, &packed(&[3.0, 0.0, 0.0, 0.0, 1.0])).unwrap();
        assert_eq!(value.to_string(), "quat(0,0,0,1)");
        assert_eq!(value.kind(), FieldKind::Quat);
    }
}
