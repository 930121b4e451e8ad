use mrsgraph::{ClosureDetails, DecomposeDetails, EpSummary, Mrs};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &Mrs, details: &DecomposeDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    print_header(input, &palette);

    println!("\n{}", palette.paint("━━━ Strategies ━━━", ansi::GRAY));
    for pass in &details.passes {
        println!(
            "  {} {}  {}",
            palette.paint(format!("{}:", pass.strategy), ansi::BLUE),
            if pass.produced > 0 {
                palette.paint(format!("✓ {} MRS", pass.produced), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {} MRS", pass.produced))
            },
            palette.dim(format!("{:?}", pass.duration)),
        );
        for (idx, eps) in pass.samples.iter().enumerate() {
            println!("    {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), fmt_eps(eps, &palette));
        }
    }

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if details.outputs.is_empty() {
        println!("{}", palette.dim("  No MRS produced"));
        println!("\n{}", palette.dim("  Tip: Set MRSGRAPH_LOG=debug to trace closure passes"));
    } else {
        for (idx, mrs) in details.outputs.iter().enumerate() {
            println!(
                "  {} {} {}",
                palette.paint(format!("[{idx}]"), ansi::GRAY),
                palette.bold(palette.paint(mrs.provenance().join(" > "), ansi::GREEN)),
                palette.dim(format!("index {}", mrs.index().map(|v| v.to_string()).unwrap_or_else(|| "-".into()))),
            );
            for line in mrs.to_string().lines() {
                println!("      {}", palette.dim(line));
            }
        }
    }

    if !details.warnings.is_empty() {
        println!("\n{}", palette.paint("━━━ Warnings ━━━", ansi::GRAY));
        for warning in &details.warnings {
            println!("  {} {}", palette.paint("!", ansi::YELLOW), warning);
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Post-process: {}  │  Dependencies: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.postprocess.total), ansi::CYAN),
        palette.dim(format!("{:?} ({} edges)", details.postprocess.dependencies, details.postprocess.edges)),
    );
    println!();
}

pub fn print_closure(input: &Mrs, details: &ClosureDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    print_header(input, &palette);

    println!("\n{}", palette.paint(format!("━━━ Closure of {} ━━━", details.seed), ansi::GRAY));
    for (idx, pass) in details.metrics.passes.iter().enumerate() {
        let added: Vec<String> = pass.added.iter().map(|id| id.to_string()).collect();
        println!(
            "  {} {} {}",
            palette.paint(format!("Pass {idx}:"), ansi::BLUE),
            if pass.produced > 0 {
                palette.paint(format!("+{} [{}]", pass.produced, added.join(", ")), ansi::GREEN)
            } else {
                palette.dim("+0")
            },
            if pass.relabelled > 0 {
                palette.paint(format!("relabelled {}", pass.relabelled), ansi::YELLOW)
            } else {
                String::new()
            },
        );
    }

    println!("\n{}", palette.paint("━━━ Kept ━━━", ansi::GRAY));
    if details.kept.is_empty() {
        println!("{}", palette.dim("  Seed selects no EP"));
    } else {
        println!("  {}", fmt_eps(&details.kept, &palette));
    }
    println!("\n{}", palette.paint("━━━ Removed ━━━", ansi::GRAY));
    println!("  {}", fmt_eps(&details.removed, &palette));

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    for line in details.result.to_string().lines() {
        println!("  {line}");
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Closure: {}", palette.paint(format!("{:?}", details.metrics.total), ansi::GREEN));
    println!();
}

fn print_header(input: &Mrs, palette: &ansi::Palette) {
    let index = input.index().map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    println!("\n{}", palette.bold(palette.paint(format!("⚙  MRS: {} EPs, index {}", input.len(), index), ansi::CYAN)));
}

fn fmt_eps(eps: &[EpSummary], palette: &ansi::Palette) -> String {
    if eps.is_empty() {
        return palette.dim("(none)");
    }
    eps.iter()
        .map(|ep| match ep.span {
            Some(span) => {
                let at = palette.dim(format!("<{}:{}>", span.from, span.to));
                format!("{}{at}", palette.paint(&ep.pred, ansi::BLUE))
            }
            None => palette.paint(&ep.pred, ansi::BLUE),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
