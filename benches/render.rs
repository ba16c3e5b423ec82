//! Benchmarks for document rendering and book building.
//!
//! Run with: cargo bench

use std::io::Cursor;

use criterion::{Criterion, criterion_group, criterion_main};

use comicpub::archive::{MemorySink, ZipSink};
use comicpub::model::SpreadSide;
use comicpub::render::{
    PageView, render_navigation_document, render_package_document, render_page_document,
};
use comicpub::{BookBuilder, ManifestEntry, Metadata, PageItem};

const PAGES: usize = 500;

fn metadata() -> Metadata {
    Metadata::new("Benchmark")
        .with_author("Author")
        .with_publisher("Publisher")
        .with_tag("bench")
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0]);
    data
}

fn sample_pages() -> Vec<PageItem> {
    (0..PAGES)
        .map(|i| {
            let page = PageItem::new(format!("p_{i}"), format!("{i}.xhtml"));
            if i % 10 == 0 {
                page.with_nav_label(Some(&format!("Chapter {}", i / 10)))
                    .with_spread(SpreadSide::Left)
            } else {
                page
            }
        })
        .collect()
}

// ============================================================================
// Renderer Benchmarks
// ============================================================================

fn bench_render_package(c: &mut Criterion) {
    let meta = metadata();
    let pages = sample_pages();
    let manifest: Vec<ManifestEntry> = pages.iter().cloned().map(ManifestEntry::from).collect();

    c.bench_function("render_package", |b| {
        b.iter(|| render_package_document(&meta, &manifest, &pages).unwrap());
    });
}

fn bench_render_navigation(c: &mut Criterion) {
    let pages = sample_pages();

    c.bench_function("render_navigation", |b| {
        b.iter(|| render_navigation_document(&pages).unwrap());
    });
}

fn bench_render_page(c: &mut Criterion) {
    let view = PageView {
        image_href: "C0001P0001.jpg",
        canvas_width: 800,
        canvas_height: 1200,
        image_width: 1600,
        image_height: 1200,
        offset_x: -800,
    };

    c.bench_function("render_page", |b| {
        b.iter(|| render_page_document(&view));
    });
}

// ============================================================================
// Book Building Benchmarks
// ============================================================================

fn bench_build_memory(c: &mut Criterion) {
    let portrait = png(800, 1200);
    let landscape = png(1600, 1200);

    c.bench_function("build_memory", |b| {
        b.iter(|| {
            let mut builder = BookBuilder::new(MemorySink::new()).with_metadata(metadata());
            for i in 0..100 {
                let data = if i % 5 == 0 { &landscape } else { &portrait };
                builder.add_page(&data[..], None).unwrap();
            }
            builder.finalize().unwrap();
            builder.into_sink()
        });
    });
}

fn bench_build_zip(c: &mut Criterion) {
    let portrait = png(800, 1200);

    c.bench_function("build_zip", |b| {
        b.iter(|| {
            let sink = ZipSink::new(Cursor::new(Vec::new()));
            let mut builder = BookBuilder::new(sink).with_metadata(metadata());
            for _ in 0..100 {
                builder.add_page(&portrait[..], None).unwrap();
            }
            builder.finalize().unwrap();
            builder.into_sink().finish().unwrap()
        });
    });
}

criterion_group!(
    benches,
    // Renderers
    bench_render_package,
    bench_render_navigation,
    bench_render_page,
    // Building
    bench_build_memory,
    bench_build_zip,
);
criterion_main!(benches);
