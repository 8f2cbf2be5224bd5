use page_flow::layout::Margins;
use page_flow::measure::{FontMeasure, Measure, TextMetrics};
use page_flow::{pagesize, Font, In, Key, LayoutConfig, PaginatedView};

// usage: paginate [document.html] [font.ttf]
fn main() {
    let mut args = std::env::args().skip(1);

    let html = match args.next() {
        Some(path) => std::fs::read_to_string(path).expect("can read document"),
        None => (0..40)
            .map(|i| format!("<h2>Section {}</h2>\n<p>{}</p>\n", i + 1, lipsum::lipsum(120)))
            .collect(),
    };

    let layout = LayoutConfig::default()
        .with_page_size(pagesize::LETTER)
        .with_margins(Margins::all(In(1.0)));

    match args.next() {
        Some(font_path) => {
            let bytes = std::fs::read(font_path).expect("can read font");
            let font = Font::load(bytes).expect("can load font");
            show(PaginatedView::from_html(&html, layout, FontMeasure::new(font)));
        }
        None => show(PaginatedView::from_html(&html, layout, TextMetrics::default())),
    }
}

fn show<M: Measure>(mut view: PaginatedView<M>) {
    println!("{} pages", view.total_pages());
    for page in view.pagination().iter() {
        println!(
            "page {:>3}: {:>3} fragments, {:>7.1}pt{}",
            page.number,
            page.fragments.len(),
            page.height.0,
            if page.overflows { " (overflows)" } else { "" }
        );
    }

    view.handle_key(Key::End);
    println!();
    println!("{}", view.render_current());
}
