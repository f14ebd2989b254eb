//! Page handlers. Every failure ends up here as a printable error.

use serde::Serialize;
use thiserror::Error;

use globetrans_fleet::client::HttpClient;
use globetrans_fleet::config::ClientConfig;
use globetrans_fleet::dtos::user::RegisterRequest;
use globetrans_fleet::dtos::{Assignment, Driver, Truck};
use globetrans_fleet::error::{ApiError, StorageError};
use globetrans_fleet::form::{Editable, FormSession};
use globetrans_fleet::nav::{self, Page};
use globetrans_fleet::session::{LocalStorage, SessionContext};
use globetrans_fleet::store::{Resource, ResourceStore};

use crate::cli::{Cli, Commands, ResourceAction};
use crate::output::{self, Row};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("The {0} page requires an admin session")]
    PageUnavailable(Page),

    #[error("No {label} with id {id}")]
    NotFound { label: &'static str, id: i64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    let client = HttpClient::new(&config)?;
    let storage = match &config.storage_path {
        Some(path) => LocalStorage::open(path)?,
        None => LocalStorage::in_memory(),
    };
    let session = SessionContext::new(storage, client.clone());
    tracing::debug!(api_url = %client.base_url(), role = ?session.role(), "session ready");

    match cli.command {
        Commands::Home => output::print_home(session.role().as_ref()),
        Commands::Login { username, password } => {
            let role = session.login(&username, &password).await?;
            println!("Logged in as {role}");
            output::print_menu(Some(&role));
        }
        Commands::Logout => {
            session.logout();
            println!("Logged out");
        }
        Commands::Whoami => match session.role() {
            Some(role) => println!("{role}"),
            None => println!("anonymous"),
        },
        Commands::Register { username, email, password, role } => {
            let request = RegisterRequest { username, email, password, role };
            session.register(&request).await?;
            println!("Registration successful! Run `fleet login` to sign in.");
        }
        Commands::Drivers { action } => {
            open_page(&session, Page::Drivers)?;
            run_page::<Driver>(&client, action, cli.json).await?;
        }
        Commands::Trucks { action } => {
            open_page(&session, Page::Trucks)?;
            run_page::<Truck>(&client, action, cli.json).await?;
        }
        Commands::Assignments { action } => {
            open_page(&session, Page::Assignments)?;
            run_page::<Assignment>(&client, action, cli.json).await?;
        }
    }
    Ok(())
}

fn open_page(session: &SessionContext, page: Page) -> Result<()> {
    let role = session.role();
    if nav::resolve(page.path(), role.as_ref()) != page {
        return Err(Error::PageUnavailable(page));
    }
    Ok(())
}

async fn run_page<R>(client: &HttpClient, action: ResourceAction, json: bool) -> Result<()>
where
    R: Editable + Row + Serialize,
{
    let title = output::capitalize(R::COLLECTION);
    let mut store = ResourceStore::<R>::new(client.clone());

    match action {
        ResourceAction::List => {
            store.load().await?;
            output::print_list(&title, store.items(), json)?;
        }
        ResourceAction::Show { id } => {
            let item = store.get_by_id(id).await?;
            output::print_detail(&item)?;
        }
        ResourceAction::Create { fields } => {
            let mut form = FormSession::<R>::new();
            bind(&mut form, &fields)?;
            form.submit(&mut store).await?;
            println!("{} created.", output::capitalize(R::LABEL));
            show_refreshed(&title, &store, json)?;
        }
        ResourceAction::Update { id, fields } => {
            let mut form = edit_from_list(&mut store, id).await?;
            bind(&mut form, &fields)?;
            form.submit(&mut store).await?;
            println!("{} {id} updated.", output::capitalize(R::LABEL));
            show_refreshed(&title, &store, json)?;
        }
        ResourceAction::Delete { id } => {
            store.remove(id).await?;
            println!("{} {id} deleted.", output::capitalize(R::LABEL));
            show_refreshed(&title, &store, json)?;
        }
    }
    Ok(())
}

/// Edits start from the freshly loaded list, the way the pages open their form.
async fn edit_from_list<R: Editable>(store: &mut ResourceStore<R>, id: i64) -> Result<FormSession<R>> {
    store.load().await?;
    let current = store.find(id).ok_or(Error::NotFound { label: R::LABEL, id })?;
    let mut form = FormSession::new();
    form.start_edit(current);
    Ok(form)
}

fn bind<R: Editable>(form: &mut FormSession<R>, fields: &[(String, String)]) -> Result<()> {
    for (name, value) in fields {
        form.set_field(name, value.as_str())?;
    }
    Ok(())
}

// The mutation already went through; a failed reload is only a warning.
fn show_refreshed<R: Resource + Row + Serialize>(
    title: &str,
    store: &ResourceStore<R>,
    json: bool,
) -> Result<()> {
    if let Some(err) = store.last_error() {
        eprintln!("Warning: could not refresh {}: {err}", R::COLLECTION);
        return Ok(());
    }
    output::print_list(title, store.items(), json)?;
    Ok(())
}
