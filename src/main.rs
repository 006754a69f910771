use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pageflow::{PageOptions, TextMeasurer};

#[derive(Parser)]
#[command(name = "pageflow", version, about = "Paginate a JSON document into fixed-height pages")]
struct Args {
    /// Document to paginate (JSON, see the input format docs)
    input: PathBuf,

    #[arg(long, default_value_t = 816.0)]
    page_width: f32,

    #[arg(long, default_value_t = 1056.0)]
    page_height: f32,

    /// Uniform page padding on all four sides
    #[arg(long, default_value_t = 48.0)]
    padding: f32,

    /// Number assigned to the first page
    #[arg(long, default_value_t = 1)]
    first_page: usize,

    /// Skip table-of-contents generation
    #[arg(long)]
    no_toc: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let options = PageOptions {
        page_width: args.page_width,
        page_height: args.page_height,
        padding_top: args.padding,
        padding_right: args.padding,
        padding_bottom: args.padding,
        padding_left: args.padding,
        toc: !args.no_toc,
        start_page_number: args.first_page,
        ..PageOptions::default()
    };

    let flow = match pageflow::paginate_file(&args.input, options, TextMeasurer::default()) {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for page in flow.pages() {
        println!(
            "page {:>3}: {:>2} sections, {:>6.1} of {:.1}",
            page.number,
            page.sections.len(),
            page.fill,
            flow.options().content_height(),
        );
    }

    let toc = flow.toc();
    if !toc.is_empty() {
        println!();
        println!("Contents");
        for entry in toc {
            let title = if entry.indent {
                format!("  {}", entry.title)
            } else {
                entry.title.clone()
            };
            println!("{:.<68}{:>4}", title, entry.page);
        }
    }

    ExitCode::SUCCESS
}
