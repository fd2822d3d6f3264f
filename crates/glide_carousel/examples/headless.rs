//! Headless Carousel Demo
//!
//! Drives a carousel without any UI: pages through a list, drags, snaps and
//! prints what a renderer would draw after each step.
//!
//! Run with: cargo run -p glide_carousel --example headless [config.toml]
//! Set RUST_LOG=glide_carousel=trace to watch loads and evictions.

use anyhow::Context;
use glide_carousel::prelude::*;

const RED_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => CarouselConfig::load(path.as_ref())
            .with_context(|| format!("loading carousel config from {path}"))?,
        None => CarouselConfig::default()
            .with_load_visible_only(true)
            .with_indicator_style(IndicatorStyle::ArrowsBelow),
    };

    let mut images = vec![RED_PIXEL.to_string(); 8];
    images[3] = "http://example.com/not encoded.png".to_string();
    images[6] = "photos/missing.png".to_string();

    let loader = MemoryCache::new(DecodingLoader::new());
    let mut carousel = Carousel::with_config(HeadlessSurface::new(), loader, config);
    carousel.set_viewport_size(Size::new(320.0, 240.0));
    carousel.set_image_list(images);
    carousel.set_caption_list(["Sunrise", "", "A much longer caption that needs two lines"]);
    carousel.pump_image_loads();
    report(&carousel, "initial");

    carousel.go_to_page(3);
    carousel.did_end_scroll_animation();
    carousel.pump_image_loads();
    report(&carousel, "after go_to_page(3)");

    // Drag a little past page 5 and let the surface settle there
    carousel.will_begin_dragging();
    let projected = carousel.will_end_dragging(Point::new(5.0 * 320.0 + 40.0, 0.0));
    carousel.surface_mut().set_content_offset(projected, true);
    carousel.did_scroll();
    carousel.did_end_decelerating();
    carousel.pump_image_loads();
    report(&carousel, "after drag");

    // Switch to custom-width pages; the surface stops paging natively
    carousel.set_page_width(Some(240.0));
    carousel.set_spacing(16.0);
    carousel.set_margin(24.0);
    carousel.pump_image_loads();
    report(&carousel, "custom page width");

    carousel.set_image_list([RED_PIXEL]);
    carousel.pump_image_loads();
    report(&carousel, "single image");

    Ok(())
}

fn report(carousel: &Carousel<HeadlessSurface>, label: &str) {
    let display = carousel.indicator_display();
    println!(
        "== {label}: page {} of {} ({:?}, {:?}) offset {:.1}",
        carousel.current_page() + 1,
        carousel.count(),
        carousel.paging_mode(),
        display.presentation,
        carousel.surface().content_offset().x,
    );
    if let Some(counter) = &display.counter_text {
        println!(
            "   counter {counter} prev={} next={}",
            display.can_go_previous, display.can_go_next
        );
    }

    for index in 0..carousel.count() {
        let Some(view) = carousel.image_view(index) else {
            continue;
        };
        let state = match view.state {
            CellState::Unloaded => "unloaded".to_string(),
            CellState::Loading(_) => "loading".to_string(),
            CellState::Loaded(loaded) => format!("loaded {:?}", loaded.transition),
            CellState::Failed(e) => format!("placeholder ({e})"),
        };
        println!(
            "   [{index}] x={:>6.1} w={:>5.1} {state}{}",
            view.frame.image.x(),
            view.frame.image.width(),
            view.caption.map(|c| format!(" \"{c}\"")).unwrap_or_default(),
        );
    }
}
