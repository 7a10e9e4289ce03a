use std::fmt;

/// Dense arena handle. Implemented by every `*Idx` newtype below.
pub trait Handle: Copy + Eq + fmt::Debug {
    /// Build a handle from a dense arena slot.
    fn from_slot(slot: u32) -> Self;

    /// Arena slot addressed by this handle.
    fn slot(self) -> usize;
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl Handle for $name {
            fn from_slot(slot: u32) -> Self {
                Self(slot)
            }

            fn slot(self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(
    /// Handle into the view table.
    ViewIdx
);
handle!(
    /// Handle into the light table.
    LightIdx
);
handle!(
    /// Handle into the texture table.
    TextureIdx
);
handle!(
    /// Handle into the material table.
    MaterialIdx
);
handle!(
    /// Handle into the transformation template table.
    TransformIdx
);
handle!(
    /// Handle into the animation template table.
    AnimationIdx
);
handle!(
    /// Handle into the primitive table.
    PrimitiveIdx
);
handle!(
    /// Handle into the component table.
    ComponentIdx
);

/// Entity kinds with their own id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Perspective or orthographic viewpoint.
    View,
    /// Omni or spot light.
    Light,
    /// Texture image reference.
    Texture,
    /// Material (appearance) definition.
    Material,
    /// Reusable transformation template.
    Transformation,
    /// Reusable animation template.
    Animation,
    /// Renderable primitive.
    Primitive,
    /// Scene-graph component.
    Component,
}

impl EntityKind {
    /// Lowercase name used in messages and declaration tags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Light => "light",
            Self::Texture => "texture",
            Self::Material => "material",
            Self::Transformation => "transformation",
            Self::Animation => "animation",
            Self::Primitive => "primitive",
            Self::Component => "component",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
