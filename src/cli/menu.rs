//! Main menu for notecmd
//!
//! Uses inquire for clean, reliable terminal interaction.

use anyhow::{anyhow, Result};
use inquire::Select;

use super::ui::{clear_screen, is_interactive, minimal_render_config, text_input, wait_for_key};
use super::{
    palette, run_draft, run_forgot_password, run_list, run_login, run_logout, run_notes_screen,
    run_signup, run_theme,
};
use crate::api::{AuthApi, NotesApi};
use crate::config::ClientConfig;
use crate::store::KeyValueStore;
use crate::views::HeaderView;

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Notes,
    List,
    Search,
    Draft,
    Login,
    Signup,
    ForgotPassword,
    Logout,
    Theme,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::Notes,
        MenuOption::List,
        MenuOption::Search,
        MenuOption::Draft,
        MenuOption::Login,
        MenuOption::Signup,
        MenuOption::ForgotPassword,
        MenuOption::Logout,
        MenuOption::Theme,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::Notes => "Notes",
            MenuOption::List => "List",
            MenuOption::Search => "Search",
            MenuOption::Draft => "Draft",
            MenuOption::Login => "Login",
            MenuOption::Signup => "Signup",
            MenuOption::ForgotPassword => "Forgot Password",
            MenuOption::Logout => "Logout",
            MenuOption::Theme => "Toggle Dark Mode",
            MenuOption::Quit => "Quit",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }

    /// Whether output stays on screen until a key press. Full-screen
    /// options clear up after themselves.
    fn pauses(self) -> bool {
        !matches!(self, MenuOption::Notes | MenuOption::Draft | MenuOption::Quit)
    }

    /// Options offered for the current login state.
    fn available(authenticated: bool) -> Vec<MenuOption> {
        MenuOption::ALL
            .iter()
            .copied()
            .filter(|opt| match opt {
                MenuOption::Login | MenuOption::Signup | MenuOption::ForgotPassword => {
                    !authenticated
                }
                MenuOption::Logout => authenticated,
                _ => true,
            })
            .collect()
    }
}

/// Run the interactive main menu
pub fn run_menu<A, S>(api: &A, store: &S, config: &ClientConfig) -> Result<()>
where
    A: NotesApi + AuthApi,
    S: KeyValueStore,
{
    if !is_interactive() {
        return Err(anyhow!(
            "Interactive menu requires a terminal. Use subcommands for non-interactive use:\n  \
            notecmd list\n  \
            notecmd add --title <TITLE> --content <CONTENT>\n  \
            Run 'notecmd --help' for all options."
        ));
    }

    loop {
        let _ = clear_screen();

        let authenticated = HeaderView::mount(store)?.is_authenticated();
        let labels: Vec<&str> = MenuOption::available(authenticated)
            .into_iter()
            .map(MenuOption::label)
            .collect();
        let title = if authenticated {
            "notecmd"
        } else {
            "notecmd (not logged in)"
        };

        let selection = Select::new(title, labels.clone())
            .with_render_config(minimal_render_config())
            .with_page_size(labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        // Ctrl+C and Escape both leave the menu
        let Ok(Some(choice_label)) = selection else {
            return Ok(());
        };

        let Some(choice) = MenuOption::from_label(choice_label) else {
            continue;
        };

        if choice == MenuOption::Quit {
            return Ok(());
        }

        let _ = clear_screen();

        match execute_command(api, store, config, choice) {
            Ok(()) if choice.pauses() => wait_for_key()?,
            Ok(()) => {}
            Err(e) => {
                eprintln!("\nError: {}", e);
                wait_for_key()?;
            }
        }
    }
}

fn execute_command<A, S>(api: &A, store: &S, config: &ClientConfig, choice: MenuOption) -> Result<()>
where
    A: NotesApi + AuthApi,
    S: KeyValueStore,
{
    match choice {
        MenuOption::Notes => run_notes_screen(api, store, config.form_reset, palette(store)?),
        MenuOption::List => run_list(api, store, None, palette(store)?),
        MenuOption::Search => {
            let query = text_input("search: ", None)?.unwrap_or_default();
            run_list(api, store, Some(&query), palette(store)?)
        }
        MenuOption::Draft => run_draft(api, store, None),
        MenuOption::Login => run_login(api, store, None),
        MenuOption::Signup => run_signup(api, None),
        MenuOption::ForgotPassword => run_forgot_password(api, store, None),
        MenuOption::Logout => run_logout(store),
        MenuOption::Theme => run_theme(store, None),
        MenuOption::Quit => Ok(()),
    }
}
