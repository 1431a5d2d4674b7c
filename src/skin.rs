//! Texture atlas skin.
//!
//! A skin describes a single texture atlas and the named icons packed into
//! it. Widgets resolve an icon name once when they build their display list
//! and use the returned [`IconId`] for size and uv lookups from then on.
//! Skins load from a JSON descriptor or are assembled programmatically.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Bounds, Size};

/// Identifies the render pipeline a display list is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(pub u32);

/// Index of an icon within a [`Skin`]. Only valid for the skin that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconId(usize);

/// One icon packed into the atlas.
#[derive(Debug, Clone)]
pub struct Icon {
    pub name: String,
    /// Placement within the atlas, in texels.
    pub tex_rect: Bounds,
    pub pipeline: PipelineId,
}

/// Errors raised while building or loading a skin.
#[derive(Debug, Error)]
pub enum SkinError {
    #[error("failed to parse skin descriptor: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate icon name: {0}")]
    DuplicateIcon(String),
    #[error("icon {0} has an empty rect")]
    EmptyRect(String),
    #[error("icon {0} does not fit the atlas")]
    OutsideAtlas(String),
}

#[derive(Debug, Deserialize)]
struct SkinDescriptor {
    texture: TextureDescriptor,
    icons: Vec<IconDescriptor>,
}

#[derive(Debug, Deserialize)]
struct TextureDescriptor {
    width: f32,
    height: f32,
}

#[derive(Debug, Deserialize)]
struct IconDescriptor {
    name: String,
    /// x, y, width, height in texels.
    rect: [f32; 4],
    #[serde(default)]
    pipeline: u32,
}

/// Named icon lookup over one texture atlas.
#[derive(Debug, Clone)]
pub struct Skin {
    atlas: Size,
    icons: Vec<Icon>,
    by_name: HashMap<String, IconId>,
}

impl Skin {
    /// Create an empty skin for an atlas of the given texel size.
    pub fn new(atlas: Size) -> Self {
        Self {
            atlas,
            icons: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Load a skin from its JSON descriptor.
    pub fn from_json(text: &str) -> Result<Self, SkinError> {
        let descriptor: SkinDescriptor = serde_json::from_str(text)?;
        let mut skin = Skin::new(Size::new(
            descriptor.texture.width,
            descriptor.texture.height,
        ));
        for icon in descriptor.icons {
            let [x, y, width, height] = icon.rect;
            skin.add_icon(
                icon.name,
                Bounds::new(x, y, width, height),
                PipelineId(icon.pipeline),
            )?;
        }
        log::debug!(
            "loaded skin: {} icons in {}x{} atlas",
            skin.icons.len(),
            skin.atlas.width,
            skin.atlas.height
        );
        Ok(skin)
    }

    /// Register an icon. Rejects duplicate names, empty rects, and rects
    /// falling outside the atlas.
    pub fn add_icon(
        &mut self,
        name: impl Into<String>,
        tex_rect: Bounds,
        pipeline: PipelineId,
    ) -> Result<IconId, SkinError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(SkinError::DuplicateIcon(name));
        }
        if tex_rect.size.is_empty() {
            return Err(SkinError::EmptyRect(name));
        }
        if tex_rect.x() < 0.0
            || tex_rect.y() < 0.0
            || tex_rect.max_x() > self.atlas.width
            || tex_rect.max_y() > self.atlas.height
        {
            return Err(SkinError::OutsideAtlas(name));
        }

        let id = IconId(self.icons.len());
        self.by_name.insert(name.clone(), id);
        self.icons.push(Icon {
            name,
            tex_rect,
            pipeline,
        });
        Ok(id)
    }

    /// Resolve an icon by name.
    pub fn icon_id(&self, name: &str) -> Option<IconId> {
        self.by_name.get(name).copied()
    }

    pub fn icon(&self, id: IconId) -> &Icon {
        &self.icons[id.0]
    }

    /// Icon footprint in texels, which doubles as its native logical size.
    pub fn icon_size(&self, id: IconId) -> Size {
        self.icons[id.0].tex_rect.size
    }

    /// Normalized uv rect as [min_u, min_v, max_u, max_v].
    pub fn uv_rect(&self, id: IconId) -> [f32; 4] {
        let rect = &self.icons[id.0].tex_rect;
        [
            rect.x() / self.atlas.width,
            rect.y() / self.atlas.height,
            rect.max_x() / self.atlas.width,
            rect.max_y() / self.atlas.height,
        ]
    }

    pub fn atlas_size(&self) -> Size {
        self.atlas
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
