use crate::assemble::{PageSlot, SlotMode, assemble};
use crate::constants::in_to_pt;
use crate::content::{TextLibrary, TextRequest, TextSpec, resolve_image, resolve_text};
use crate::geometry::BookGeometry;
use crate::layout::*;
use crate::options::{BookConfig, PageEntryConfig};
use crate::render::{BookFont, PdfRenderer};
use crate::types::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A validated book: config, text library and font, ready to lay out
#[derive(Debug)]
pub struct Book {
    config: BookConfig,
    geometry: BookGeometry,
    regions: Vec<RegionLayout>,
    image_folder: PathBuf,
    library: TextLibrary,
    font: BookFont,
}

impl Book {
    pub fn new(config: BookConfig, library: TextLibrary, font: BookFont) -> Result<Self> {
        config.validate()?;
        let geometry = config.geometry()?;
        let image_folder = config.image_folder()?;

        let regions = config
            .book
            .text_layout
            .iter()
            .map(|(name, options)| {
                let folder = options.folder.as_deref().map(|f| config.resolve_path(f));
                RegionLayout::from_options(name, options, folder)
            })
            .collect();

        if !library.pages().is_empty() {
            log::info!(
                "Using {} page entries from the text library instead of the config",
                library.pages().len()
            );
            for (index, entry) in library.pages().iter().enumerate() {
                entry.validate(&entry.slug_or_default(index))?;
            }
        }

        Ok(Self {
            config,
            geometry,
            regions,
            image_folder,
            library,
            font,
        })
    }

    pub fn geometry(&self) -> &BookGeometry {
        &self.geometry
    }

    /// The page list in effect; library pages replace the config's own
    pub fn entries(&self) -> &[PageEntryConfig] {
        if self.library.pages().is_empty() {
            &self.config.pages
        } else {
            self.library.pages()
        }
    }

    /// PDF document title: `book.title`, else the output file's stem
    pub fn title(&self) -> String {
        self.config.book.title.clone().unwrap_or_else(|| {
            self.config
                .output_pdf()
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Book".to_string())
        })
    }

    /// Resolve the image and every region's text for one page slot
    pub fn resolve_page(&self, slot: &PageSlot) -> Result<ResolvedPage> {
        let entry = self.entries().get(slot.entry_index).ok_or_else(|| {
            BookError::Config(format!("page '{}' has no matching entry", slot.slug))
        })?;

        let image = match &entry.image {
            Some(image) => {
                let path = resolve_image(&slot.slug, image, &self.image_folder)?;
                let (width, height) =
                    image::image_dimensions(&path).map_err(|e| BookError::ImageDecode {
                        slug: slot.slug.clone(),
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                Some(SourceImage {
                    path,
                    size: ImageSize { width, height },
                })
            }
            None => {
                log::debug!("Page '{}' has no image", slot.slug);
                None
            }
        };

        let defaults = &self.config.book.defaults;
        let offset = entry.image_offset_in.unwrap_or_default();
        let offset_x = offset.x.or(defaults.image_offset_in.x).unwrap_or(0.0);
        let offset_y = offset.y.or(defaults.image_offset_in.y).unwrap_or(0.0);

        for name in entry.text.keys() {
            if !self.regions.iter().any(|region| &region.name == name) {
                log::warn!(
                    "Page '{}': region '{}' is not in text_layout, ignoring its text",
                    slot.slug,
                    name
                );
            }
        }

        let mut texts = BTreeMap::new();
        for region in &self.regions {
            let raw = entry.text.get(&region.name).and_then(Option::as_ref);
            let spec = TextSpec::parse_optional(raw, &slot.slug, &region.name)?;
            let request = TextRequest {
                slug: &slot.slug,
                region: &region.name,
                side: slot.side,
                index: slot.index,
                folder: region.folder.as_deref(),
            };
            if let Some(text) = resolve_text(spec.as_ref(), &request, &self.library)? {
                texts.insert(region.name.clone(), text);
            }
        }

        Ok(ResolvedPage {
            page_number: slot.page_number,
            slug: slot.slug.clone(),
            side: slot.side,
            index: slot.index,
            image,
            image_scale: entry.image_scale.unwrap_or(defaults.image_scale),
            offset_x_pt: in_to_pt(offset_x),
            offset_y_pt: in_to_pt(offset_y),
            texts,
        })
    }

    /// Assemble, resolve and lay out every page in order
    pub fn layout(&self) -> Result<Vec<LayoutResult>> {
        let slots = assemble(self.entries())?;
        log::info!(
            "Laying out {} page(s) at {:.2}x{:.2}pt",
            slots.len(),
            self.geometry.canvas_width(),
            self.geometry.canvas_height()
        );

        let layouter = PageLayouter::new(self.geometry, &self.regions, &self.font);
        let mut layouts = Vec::with_capacity(slots.len());
        let mut slots = slots.iter();

        while let Some(slot) = slots.next() {
            match slot.mode {
                SlotMode::Single => {
                    let page = self.resolve_page(slot)?;
                    layouts.push(layouter.layout_single(&page)?);
                }
                SlotMode::Spread => {
                    let right_slot = slots.next().ok_or_else(|| BookError::Layout {
                        slug: slot.slug.clone(),
                        region: "image".to_string(),
                        reason: "spread is missing its right-hand page".to_string(),
                    })?;
                    let left = self.resolve_page(slot)?;
                    let right = self.resolve_page(right_slot)?;
                    layouts.extend(layouter.layout_spread(&left, &right)?);
                }
            }
        }

        Ok(layouts)
    }

    /// Draw laid-out pages into PDF bytes
    pub fn render(&self, layouts: &[LayoutResult]) -> Result<Vec<u8>> {
        let mut renderer = PdfRenderer::new(&self.title(), &self.font)?;
        for layout in layouts {
            renderer.add_page(layout)?;
        }
        log::info!("Rendered {} page(s)", renderer.page_count());
        renderer.finish()
    }
}
