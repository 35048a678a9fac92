use bath::{Action, ActionKind, FindResultVerbose, RunDetails};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
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

pub fn print_run(source: &str, res: &FindResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Trace: {source}"), ansi::CYAN)));
    println!("  {} {}", palette.dim("straws:"), palette.paint(details.straws.join(", "), ansi::BLUE));

    println!("\n{}", palette.paint("━━━ Saturation ━━━", ansi::GRAY));
    print_passes(details, &palette);

    println!("\n{}", palette.paint("━━━ Actions ━━━", ansi::GRAY));
    if res.actions.is_empty() {
        println!("{}", palette.dim("  No actions recognized"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • The trace holds no jetton operations");
        println!("  • Decoded bodies are missing, so operation checks fail");
        println!("  • A builder failed (see the error log)");
        println!("\n{}", palette.dim("  Tip: Set RUST_LOG=bath=debug to see every merge"));
    } else {
        for (idx, action) in res.actions.iter().enumerate() {
            print_action(idx, action, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Saturation: {}  │  Project: {}  │  Bubbles left: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.saturation_total), ansi::CYAN),
        palette.dim(format!("{:?}", details.project)),
        palette.dim(details.forest.len().to_string()),
    );
    println!();
}

fn print_passes(details: &RunDetails, palette: &ansi::Palette) {
    for pass in &details.passes {
        println!(
            "  {} {}  {}",
            palette.paint(format!("Pass {}:", pass.pass), ansi::BLUE),
            if pass.merged > 0 {
                palette.paint(format!("✓ {} merges", pass.merged), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {} merges", pass.merged))
            },
            palette.dim(format!("{} attempts in {:?}", pass.attempts, pass.duration)),
        );
    }
    if !details.reached_fixpoint {
        println!("  {}", palette.paint("! pass limit reached before a fixpoint", ansi::YELLOW));
    }
}

fn print_action(idx: usize, action: &Action, palette: &ansi::Palette) {
    let status = if action.success { palette.paint("ok", ansi::GREEN) } else { palette.paint("failed", ansi::RED) };
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{idx}]"), ansi::GRAY),
        palette.bold(palette.paint(action.kind.name(), ansi::GREEN)),
        palette.dim("│"),
        status,
    );

    match action.kind {
        ActionKind::JettonTransfer => {
            let Some(t) = &action.jetton_transfer else { return };
            let owner = |id: Option<bath::AccountId>| id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
            field(palette, "jetton", t.jetton.to_string());
            field(palette, "amount", t.amount.to_string());
            field(palette, "from", format!("{} (wallet {})", owner(t.sender), t.senders_wallet));
            field(palette, "to", format!("{} (wallet {})", owner(t.recipient), t.recipients_wallet));
            if let Some(comment) = &t.comment {
                field(palette, "comment", comment.clone());
            }
            if let Some(encrypted) = &t.encrypted_comment {
                field(palette, "encrypted", format!("{} bytes", encrypted.cipher_text.len()));
            }
        }
        ActionKind::JettonMint => {
            let Some(m) = &action.jetton_mint else { return };
            field(palette, "jetton", m.jetton.to_string());
            field(palette, "amount", m.amount.to_string());
            field(palette, "to", format!("{} (wallet {})", m.recipient, m.recipients_wallet));
        }
    }
}

fn field(palette: &ansi::Palette, name: &str, value: String) {
    println!("      {} {}", palette.dim(format!("{name}:")), palette.paint(value, ansi::CYAN));
}
