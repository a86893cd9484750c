//! Built-in class tables shipped with the decoder
//!
//! Revision 1 covers the Cocos Creator 2.x engine classes. Field order is
//! the packed order; it must never change for a shipped revision.

use super::types::FieldKind::{self, *};

/// Revision of the built-in table.
pub const BUILTIN_REVISION: u32 = 1;

/// Class used for node attributes when a record carries no type.
pub const NODE_CLASS: &str = "cc.Node";

type ClassTable = &'static [(&'static str, &'static [(&'static str, FieldKind)])];

pub(crate) const REVISION_1: ClassTable = &[
    (
        "cc.Node",
        &[
            ("_name", String),
            ("_opacity", Number),
            ("_objFlags", Number),
            ("_active", Bool),
            ("_id", String),
            ("_components", Array),
            ("_contentSize", Size),
            ("_parent", ObjectRef),
            ("_prefab", Any),
            ("_trs", Array),
            ("_children", Array),
            ("_anchorPoint", Vec2),
            ("_color", Color),
        ],
    ),
    (
        "cc.Scene",
        &[
            ("_name", String),
            ("_active", Bool),
            ("autoReleaseAssets", Bool),
            ("_children", Array),
            ("_anchorPoint", Vec2),
            ("_trs", Array),
        ],
    ),
    (
        "cc.Label",
        &[
            ("_N$verticalAlign", Number),
            ("_N$horizontalAlign", Number),
            ("_string", String),
            ("_fontSize", Number),
            ("_isSystemFontUsed", Bool),
            ("_N$cacheMode", Number),
            ("_lineHeight", Number),
            ("_styleFlags", Number),
            ("_N$overflow", Number),
            ("_enableWrapText", Bool),
            ("node", ObjectRef),
            ("_materials", AssetList),
            ("_N$file", Asset),
        ],
    ),
    (
        "cc.Sprite",
        &[
            ("_sizeMode", Number),
            ("_type", Number),
            ("_isTrimmedMode", Bool),
            ("_enabled", Bool),
            ("_dstBlendFactor", Number),
            ("_fillRange", Number),
            ("node", ObjectRef),
            ("_materials", AssetList),
            ("_spriteFrame", Asset),
        ],
    ),
    (
        "cc.Button",
        &[
            ("zoomScale", Number),
            ("_N$transition", Number),
            ("_N$enableAutoGrayEffect", Bool),
            ("node", ObjectRef),
            ("clickEvents", Array),
            ("_N$pressedColor", Color),
            ("_N$disabledColor", Color),
            ("_N$target", ObjectRef),
            ("_N$normalColor", Color),
            ("_N$normalSprite", Asset),
            ("_N$pressedSprite", Asset),
            ("_N$hoverSprite", Asset),
            ("_N$disabledSprite", Asset),
        ],
    ),
    (
        "cc.Widget",
        &[
            ("_alignFlags", Number),
            ("_originalWidth", Number),
            ("_left", Number),
            ("_right", Number),
            ("_bottom", Number),
            ("_top", Number),
            ("_originalHeight", Number),
            ("alignMode", Number),
            ("_enabled", Bool),
            ("node", ObjectRef),
            ("_target", ObjectRef),
        ],
    ),
    (
        "cc.Animation",
        &[
            ("playOnLoad", Bool),
            ("node", ObjectRef),
            ("_clips", AssetList),
            ("_defaultClip", Asset),
        ],
    ),
    (
        "cc.AnimationClip",
        &[
            ("_name", String),
            ("_duration", Number),
            ("sample", Number),
            ("wrapMode", Number),
            ("speed", Number),
            ("curveData", Any),
        ],
    ),
    (
        "cc.ParticleSystem",
        &[
            ("_dstBlendFactor", Number),
            ("_custom", Bool),
            ("totalParticles", Number),
            ("emissionRate", Number),
            ("life", Number),
            ("angle", Number),
            ("angleVar", Number),
            ("speed", Number),
            ("tangentialAccel", Number),
            ("lifeVar", Number),
            ("startSize", Number),
            ("speedVar", Number),
            ("endSize", Number),
            ("_positionType", Number),
            ("endRadius", Number),
            ("startSizeVar", Number),
            ("endSizeVar", Number),
            ("endSpinVar", Number),
            ("emitterMode", Number),
            ("endRadiusVar", Number),
            ("startRadius", Number),
            ("duration", Number),
            ("radialAccelVar", Number),
            ("node", ObjectRef),
            ("_materials", AssetList),
            ("_startColor", Color),
            ("_startColorVar", Color),
            ("_endColor", Color),
            ("_endColorVar", Color),
            ("posVar", Vec2),
            ("_file", Asset),
            ("_spriteFrame", Asset),
            ("gravity", Vec2),
        ],
    ),
    (
        "cc.ProgressBar",
        &[
            ("_N$mode", Number),
            ("_N$progress", Number),
            ("_N$totalLength", Number),
            ("node", ObjectRef),
            ("_N$barSprite", Any),
        ],
    ),
    (
        "cc.Slider",
        &[
            ("_N$progress", Number),
            ("node", ObjectRef),
            ("slideEvents", Array),
            ("_N$handle", Any),
        ],
    ),
    (
        "cc.ScrollView",
        &[
            ("horizontal", Bool),
            ("brake", Number),
            ("bounceDuration", Number),
            ("_N$horizontalScrollBar", Any),
            ("_N$verticalScrollBar", Any),
            ("node", ObjectRef),
            ("_N$content", ObjectRef),
        ],
    ),
    (
        "cc.Layout",
        &[
            ("_resize", Number),
            ("_N$layoutType", Number),
            ("_N$paddingLeft", Number),
            ("_N$spacingX", Number),
            ("_N$spacingY", Number),
            ("_N$paddingRight", Number),
            ("_enabled", Bool),
            ("node", ObjectRef),
            ("_layoutSize", Size),
        ],
    ),
    (
        "cc.Mask",
        &[
            ("_N$alphaThreshold", Number),
            ("_type", Number),
            ("node", ObjectRef),
            ("_materials", AssetList),
            ("_spriteFrame", Asset),
        ],
    ),
    (
        "cc.Canvas",
        &[
            ("_fitWidth", Bool),
            ("node", ObjectRef),
            ("_designResolution", Size),
        ],
    ),
    (
        "cc.Camera",
        &[
            ("_clearFlags", Number),
            ("_depth", Number),
            ("node", ObjectRef),
        ],
    ),
];

/// Built-in table for a revision, if one ships
pub(crate) fn table_for(revision: u32) -> Option<ClassTable> {
    match revision {
        BUILTIN_REVISION => Some(REVISION_1),
        _ => None,
    }
}
