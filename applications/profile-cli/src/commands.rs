//! Terminal commands
//!
//! Every command signs in, builds the account form on the session and drives
//! it the way the screen would. Notifications are written to the output after
//! each step.

use crate::config::AppConfig;
use crate::error::{CliError, Result};
use clap::Subcommand;
use profile_client::BackendClient;
use profile_core::{SelectedFile, Session};
use profile_ui::{ProfileForm, Severity, SignInPage, ToastView, UiSettings};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the profile
    Show {
        /// Print the fields as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit profile fields and save them (an empty value clears a field)
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    /// Upload an image as the new avatar
    UploadAvatar {
        /// Image file path
        file: PathBuf,
    },
    /// Save the current avatar image to a file
    DownloadAvatar {
        /// Destination file path
        dest: PathBuf,
    },
    /// Sign in, then end the session
    SignOut,
}

/// Sign-in credentials
#[derive(Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Run `command` against the configured backend, writing results to `out`.
pub async fn run<W: Write>(
    command: Command,
    config: &AppConfig,
    credentials: &Credentials,
    out: &mut W,
) -> Result<()> {
    let client = Arc::new(BackendClient::new(config.backend.client_config())?);

    let session = sign_in(&client, &config.ui, credentials, out).await?;
    let form = ProfileForm::new(
        session,
        client.clone(),
        client.clone(),
        client,
        config.ui.clone(),
    );

    if let Command::SignOut = command {
        let result = form.sign_out().await;
        report(&form, out)?;
        result?;
        writeln!(out, "Signed out")?;
        return Ok(());
    }

    let loaded = form.load().await;
    report(&form, out)?;
    loaded?;

    match command {
        Command::Show { json } => show(&form, json, out),
        Command::Update {
            full_name,
            username,
            website,
        } => update(&form, full_name, username, website, out).await,
        Command::UploadAvatar { file } => upload_avatar(&form, &file, out).await,
        Command::DownloadAvatar { dest } => download_avatar(&form, &dest, out).await,
        Command::SignOut => Ok(()),
    }
}

async fn sign_in<W: Write>(
    client: &Arc<BackendClient>,
    settings: &UiSettings,
    credentials: &Credentials,
    out: &mut W,
) -> Result<Session> {
    let page = SignInPage::new(client.clone(), settings.clone());
    page.set_email(credentials.email.as_str());
    page.set_password(credentials.password.as_str());

    let result = page.sign_in().await;
    write_toast(out, page.view().toast)?;
    Ok(result?)
}

fn show<W: Write>(form: &ProfileForm, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", form.fields_json()?)?;
        return Ok(());
    }

    let view = form.view();
    let fields = form.fields();
    writeln!(out, "Email:     {}", view.email.as_deref().unwrap_or("-"))?;
    writeln!(out, "Full name: {}", or_dash(&view.full_name))?;
    writeln!(out, "Username:  {}", or_dash(&view.username))?;
    writeln!(out, "Website:   {}", or_dash(&view.website))?;

    match (fields.avatar_url, view.avatar.image) {
        (Some(path), Some(image)) => writeln!(
            out,
            "Avatar:    {} ({} bytes, {})",
            path,
            image.data.len(),
            image.mime_type
        )?,
        (Some(path), None) => writeln!(out, "Avatar:    {path} (unavailable)")?,
        (None, _) => writeln!(out, "Avatar:    -")?,
    }
    Ok(())
}

async fn update<W: Write>(
    form: &ProfileForm,
    full_name: Option<String>,
    username: Option<String>,
    website: Option<String>,
    out: &mut W,
) -> Result<()> {
    if let Some(value) = full_name {
        form.set_full_name(value);
    }
    if let Some(value) = username {
        form.set_username(value);
    }
    if let Some(value) = website {
        form.set_website(value);
    }

    let result = form.submit().await;
    report(form, out)?;
    let record = result?;

    info!(user_id = %record.id, "Profile saved");
    Ok(())
}

async fn upload_avatar<W: Write>(form: &ProfileForm, file: &Path, out: &mut W) -> Result<()> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::InvalidPath(file.display().to_string()))?;
    let bytes = tokio::fs::read(file).await?;

    let result = form.upload_avatar(&[SelectedFile::new(name, bytes)]).await;
    report(form, out)?;
    let record = result?;

    if let Some(path) = record.avatar_url {
        writeln!(out, "Avatar stored at {path}")?;
    }
    Ok(())
}

async fn download_avatar<W: Write>(form: &ProfileForm, dest: &Path, out: &mut W) -> Result<()> {
    let image = form.avatar().image().ok_or(CliError::NoAvatar)?;

    tokio::fs::write(dest, &image.data).await?;
    writeln!(
        out,
        "Saved avatar to {} ({} bytes, {})",
        dest.display(),
        image.data.len(),
        image.mime_type
    )?;
    Ok(())
}

/// Write whatever the avatar and the form are currently showing.
fn report<W: Write>(form: &ProfileForm, out: &mut W) -> Result<()> {
    write_toast(out, form.avatar().view().toast)?;
    write_toast(out, form.view().toast)
}

fn write_toast<W: Write>(out: &mut W, toast: Option<ToastView>) -> Result<()> {
    if let Some(toast) = toast {
        let label = match toast.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        writeln!(out, "[{label}] {}", toast.message)?;
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
