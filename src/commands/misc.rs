use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use ossify::catalog;

pub fn list_languages() {
    println!("Languages:\n");
    for lang in catalog::LANGUAGES {
        println!("  {:<12} {:<16} {}", lang.value, lang.label, lang.color);
    }
    println!("\nTrending windows:");
    for period in catalog::TIME_PERIODS {
        println!("  {:<12} {}", period.value, period.label);
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = crate::Cli::command();
    generate(shell, &mut cmd, "ossify", &mut io::stdout());

    eprintln!();
    eprintln!("Save the output to the appropriate location for your shell:");
    match shell {
        Shell::Bash => {
            eprintln!("  ossify completions bash > ~/.local/share/bash-completion/completions/ossify");
        }
        Shell::Zsh => {
            eprintln!("  ossify completions zsh > ~/.zsh/completions/_ossify");
            eprintln!("  # (Add 'fpath=(~/.zsh/completions $fpath)' before 'compinit' in .zshrc)");
        }
        Shell::Fish => {
            eprintln!("  ossify completions fish > ~/.config/fish/completions/ossify.fish");
        }
        _ => {}
    }
}
