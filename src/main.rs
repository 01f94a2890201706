use clap::Parser;
use notecmd::api::HttpClient;
use notecmd::cli::{
    palette, run_add, run_config_clear, run_config_set, run_config_show, run_delete, run_draft,
    run_edit, run_forgot_password, run_list, run_login, run_logout, run_menu, run_signup,
    run_theme, Cli, Commands, ConfigCommand,
};
use notecmd::config::ClientConfig;
use notecmd::db::Database;
use notecmd::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let db = Database::open()?;
    // Config commands must work even when stored settings are unusable.
    let config = match cli.command {
        Some(Commands::Config(_)) => ClientConfig::load_lenient(&db)?,
        _ => ClientConfig::load(&db)?,
    }
    .with_api_url(cli.api_url);
    let connect = || HttpClient::new(config.effective_api_url(), config.effective_timeout());

    match cli.command {
        None => {
            // No subcommand provided - show interactive menu
            run_menu(&connect()?, &db, &config)?;
        }
        Some(Commands::Login(args)) => {
            run_login(&connect()?, &db, args.username)?;
        }
        Some(Commands::Signup(args)) => {
            run_signup(&connect()?, args.username)?;
        }
        Some(Commands::ForgotPassword { email }) => {
            run_forgot_password(&connect()?, &db, email)?;
        }
        Some(Commands::Logout) => {
            run_logout(&db)?;
        }
        Some(Commands::List { query }) => {
            run_list(&connect()?, &db, query.as_deref(), palette(&db)?)?;
        }
        Some(Commands::Add(fields)) => {
            run_add(&connect()?, &db, config.form_reset, &fields)?;
        }
        Some(Commands::Edit { id, fields }) => {
            run_edit(&connect()?, &db, config.form_reset, &id, &fields)?;
        }
        Some(Commands::Delete { id, force }) => {
            run_delete(&connect()?, &db, &id, force, palette(&db)?)?;
        }
        Some(Commands::Draft { publish }) => {
            run_draft(&connect()?, &db, publish)?;
        }
        Some(Commands::Theme { mode }) => {
            run_theme(&db, mode.map(|m| m.enabled()))?;
        }
        Some(Commands::Config(ConfigCommand::Show)) => {
            run_config_show(&db, &config)?;
        }
        Some(Commands::Config(ConfigCommand::Set { key, value })) => {
            run_config_set(&db, &key, &value)?;
        }
        Some(Commands::Config(ConfigCommand::Clear)) => {
            run_config_clear(&db)?;
        }
    }

    Ok(())
}
