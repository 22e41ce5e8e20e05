use pdf_book::layout::*;
use pdf_book::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

const EPS: f32 = 1e-3;

fn geometry() -> BookGeometry {
    BookGeometry::from_inches(6.0, 9.0, 0.125).unwrap()
}

fn resolved(page_number: u32, index: usize, image: Option<ImageSize>) -> ResolvedPage {
    ResolvedPage {
        page_number,
        slug: "sunrise".to_string(),
        side: PageSide::from_page_number(page_number),
        index,
        image: image.map(|size| SourceImage {
            path: PathBuf::from("sunrise.png"),
            size,
        }),
        image_scale: 1.0,
        offset_x_pt: 0.0,
        offset_y_pt: 0.0,
        texts: BTreeMap::new(),
    }
}

fn book(yaml: &str) -> Book {
    let config = BookConfig::from_str(yaml, DocumentFormat::Yaml, PathBuf::from(".")).unwrap();
    Book::new(config, TextLibrary::empty(), BookFont::builtin()).unwrap()
}

fn region_text(layout: &LayoutResult, region: &str) -> Option<String> {
    layout
        .text_boxes
        .iter()
        .find(|b| b.region == region)
        .map(|b| b.text.clone())
}

#[test]
fn test_canvas_is_trim_plus_bleed() {
    let geometry = geometry();
    assert!((geometry.canvas_width() - 6.25 * 72.0).abs() < EPS);
    assert!((geometry.canvas_height() - 9.25 * 72.0).abs() < EPS);

    let regions: Vec<RegionLayout> = Vec::new();
    let metrics = FixedWidthMetrics::helvetica();
    let layouter = PageLayouter::new(geometry, &regions, &metrics);
    let image = Some(ImageSize {
        width: 2000,
        height: 1500,
    });

    let single = layouter.layout_single(&resolved(1, 0, image)).unwrap();
    let [left, right] = layouter
        .layout_spread(&resolved(2, 0, image), &resolved(3, 1, image))
        .unwrap();
    for layout in [&single, &left, &right] {
        assert_eq!(layout.canvas, geometry.canvas());
        assert_eq!(layout.trim_box, geometry.trim_box());
    }
}

#[test]
fn test_spread_on_even_page_is_complementary() {
    let geometry = geometry();
    let regions: Vec<RegionLayout> = Vec::new();
    let metrics = FixedWidthMetrics::helvetica();
    let layouter = PageLayouter::new(geometry, &regions, &metrics);
    let image = Some(ImageSize {
        width: 2000,
        height: 1500,
    });

    let [left, right] = layouter
        .layout_spread(&resolved(2, 0, image), &resolved(3, 1, image))
        .unwrap();
    assert_eq!(left.side, PageSide::Left);
    assert_eq!(right.side, PageSide::Right);

    let left_image = left.image.unwrap().placement;
    let right_image = right.image.unwrap().placement;

    let left_half = left_image.spread_half.unwrap();
    let right_half = right_image.spread_half.unwrap();
    assert!((left_half.width + right_half.width - geometry.spread_canvas().width).abs() < EPS);
    assert!((left_half.right() - right_half.x).abs() < EPS);
    assert!((left_half.right() - geometry.spine_x()).abs() < EPS);

    // Same scale, one image shifted by a trim width
    assert!((left_image.scale - right_image.scale).abs() < 1e-6);
    assert!((left_image.rect.x - geometry.trim_width_pt - right_image.rect.x).abs() < EPS);

    // The visible source columns meet without gap or overlap
    let seam = left_image.source_crop.x + left_image.source_crop.width;
    assert!((seam - right_image.source_crop.x).abs() < 0.01);
}

#[test]
fn test_spread_on_odd_page_is_rejected_before_layout() {
    let regions: Vec<RegionLayout> = Vec::new();
    let metrics = FixedWidthMetrics::helvetica();
    let layouter = PageLayouter::new(geometry(), &regions, &metrics);
    let err = layouter
        .layout_spread(&resolved(3, 0, None), &resolved(4, 1, None))
        .unwrap_err();
    assert!(matches!(
        err,
        BookError::SpreadAlignment { page_number: 3, .. }
    ));

    let book = book(
        r#"
book: { image_folder: art }
pages:
  - slug: one
  - slug: two
  - slug: sunrise
    kind: spread
"#,
    );
    match book.layout() {
        Err(BookError::SpreadAlignment { slug, page_number }) => {
            assert_eq!(slug, "sunrise");
            assert_eq!(page_number, 3);
        }
        other => panic!("expected SpreadAlignment, got {other:?}"),
    }
}

#[test]
fn test_by_side_text_on_spread() {
    let book = book(
        r#"
book:
  image_folder: art
  text_layout:
    bottom: { font_size_pt: 12 }
pages:
  - slug: cover
  - slug: pair
    kind: spread
    text: { bottom: ["Left text", "Right text"] }
  - slug: same
    kind: spread
    text: { bottom: ["Only one"] }
"#,
    );
    let layouts = book.layout().unwrap();
    assert_eq!(layouts.len(), 5);
    assert_eq!(region_text(&layouts[0], "bottom"), None);
    assert_eq!(region_text(&layouts[1], "bottom").as_deref(), Some("Left text"));
    assert_eq!(region_text(&layouts[2], "bottom").as_deref(), Some("Right text"));
    assert_eq!(region_text(&layouts[3], "bottom").as_deref(), Some("Only one"));
    assert_eq!(region_text(&layouts[4], "bottom").as_deref(), Some("Only one"));
}

#[test]
fn test_null_by_side_entry_leaves_page_blank() {
    let book = book(
        r#"
book:
  image_folder: art
  text_layout:
    bottom: {}
pages:
  - slug: cover
  - slug: pair
    kind: spread
    text: { bottom: [~, Right] }
"#,
    );
    let layouts = book.layout().unwrap();
    assert_eq!(layouts.len(), 3);
    assert_eq!(region_text(&layouts[1], "bottom"), None);
    assert!(layouts[1].text_boxes.is_empty());
    assert_eq!(region_text(&layouts[2], "bottom").as_deref(), Some("Right"));
}

#[test]
fn test_inner_margin_flips_with_parity() {
    let book = book(
        r#"
book:
  image_folder: art
  text_layout:
    bottom:
      inset_in: { inner: 1.0, outer: 0.25 }
pages:
  - { slug: a, text: { bottom: Odd } }
  - { slug: b, text: { bottom: Even } }
"#,
    );
    let layouts = book.layout().unwrap();
    let canvas = book.geometry().canvas();

    let odd = layouts[0].text_boxes[0].rect;
    assert_eq!(layouts[0].side, PageSide::Right);
    assert!((odd.x - 72.0).abs() < EPS);
    assert!((canvas.right() - odd.right() - 18.0).abs() < EPS);

    let even = layouts[1].text_boxes[0].rect;
    assert_eq!(layouts[1].side, PageSide::Left);
    assert!((even.x - 18.0).abs() < EPS);
    assert!((canvas.right() - even.right() - 72.0).abs() < EPS);
}

#[test]
fn test_inline_wins_over_library() {
    let config = BookConfig::from_str(
        r#"
book:
  image_folder: art
  text_layout: { top: {} }
pages:
  - slug: cover
    text: { top: { inline: "Inline title", library: cover } }
  - slug: second
"#,
        DocumentFormat::Yaml,
        PathBuf::from("."),
    )
    .unwrap();
    let library = TextLibrary::from_str(
        "cover: { top: Library title }\nsecond: { top: Second title }\n",
        DocumentFormat::Yaml,
    )
    .unwrap();
    let book = Book::new(config, library, BookFont::builtin()).unwrap();
    let layouts = book.layout().unwrap();
    assert_eq!(region_text(&layouts[0], "top").as_deref(), Some("Inline title"));
    // No explicit spec: silent fallback to the library
    assert_eq!(region_text(&layouts[1], "top").as_deref(), Some("Second title"));
}

#[test]
fn test_layout_is_deterministic() {
    let yaml = r#"
book:
  image_folder: art
  bleed_in: 0.125
  text_layout:
    top: { align: justify }
    bottom: { align: right, inset_in: 0.3 }
pages:
  - slug: a
    text: { top: "A fairly long line of text that will need to wrap across the box", bottom: B }
  - slug: b
    kind: spread
    text: { bottom: { left: L, right: R } }
"#;
    let first = book(yaml).layout().unwrap();
    let second = book(yaml).layout().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_library_pages_replace_config_pages() {
    let config = BookConfig::from_str(
        "book: { image_folder: art, text_layout: { bottom: {} } }\npages: [ { slug: ignored } ]\n",
        DocumentFormat::Yaml,
        PathBuf::from("."),
    )
    .unwrap();
    let library = TextLibrary::from_str(
        r#"
pages:
  - slug: first
    text: { bottom: From the library page }
  - slug: second
"#,
        DocumentFormat::Yaml,
    )
    .unwrap();
    let book = Book::new(config, library, BookFont::builtin()).unwrap();
    assert_eq!(book.entries().len(), 2);

    let layouts = book.layout().unwrap();
    assert_eq!(layouts[0].slug, "first");
    assert_eq!(
        region_text(&layouts[0], "bottom").as_deref(),
        Some("From the library page")
    );
    assert_eq!(region_text(&layouts[1], "bottom"), None);
}
