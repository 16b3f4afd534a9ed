use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use {
    anyhow::Context,
    clap::{Args, Parser, Subcommand, ValueEnum},
    evoapi::bulk::{
        BulkCommand, BulkRequest, CandidateSet, ProgressReporter, RunOutcome, TracingProgress,
        check_numbers,
    },
    evoapi::{
        ApiResponse, ConnectCode, ContactCard, CreateInstance, EvolutionClient, FetchInstances,
        GatewayConfig, InstanceName, Integration, MessageKey, MessageText, Presence, RecipientId,
        SendContact, SendLocation, SendMediaRef, SendPoll, SendReaction, SendText,
    },
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "evoapi", version, about = "Evolution WhatsApp gateway client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Gateway base URL, e.g. `http://localhost:8080`.
    #[arg(long, global = true, env = "EVOLUTION_BASE_URL")]
    base_url: Option<String>,

    /// Global API key sent in the `apikey` header.
    #[arg(long, global = true, env = "EVOLUTION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds (0 disables it).
    #[arg(long, global = true, env = "EVOLUTION_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Args)]
struct InstanceArg {
    /// Instance (WhatsApp session) name.
    #[arg(short, long, env = "EVOLUTION_INSTANCE")]
    instance: String,
}

#[derive(Args)]
struct NumbersArg {
    /// Numbers separated by commas and/or newlines.
    #[arg(
        long,
        conflicts_with = "numbers_file",
        required_unless_present = "numbers_file"
    )]
    numbers: Option<String>,

    /// File with numbers; `-` reads standard input.
    #[arg(long)]
    numbers_file: Option<PathBuf>,
}

impl NumbersArg {
    fn read(self) -> anyhow::Result<String> {
        match (self.numbers, self.numbers_file) {
            (Some(numbers), _) => Ok(numbers),
            (None, Some(path)) => read_numbers(&path),
            (None, None) => Ok(String::new()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Send one text to many numbers, paced, and print a report.
    Bulk {
        #[command(flatten)]
        instance: InstanceArg,
        #[command(flatten)]
        numbers: NumbersArg,
        #[arg(short, long)]
        text: String,
        /// Pause between consecutive sends, in milliseconds.
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Skip numbers that have no WhatsApp account.
        #[arg(long, default_value_t = false)]
        validate: bool,
    },
    /// Send a text message.
    SendText {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        text: String,
    },
    /// Check which numbers have a WhatsApp account and print them grouped.
    CheckNumbers {
        #[command(flatten)]
        instance: InstanceArg,
        #[command(flatten)]
        numbers: NumbersArg,
    },
    /// Send a location pin.
    SendLocation {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        to: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Share a contact card.
    SendContact {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        to: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        wuid: String,
        #[arg(long)]
        phone_number: String,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
    /// Send a poll.
    SendPoll {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        to: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        selectable_count: usize,
        /// Poll option; repeat for each option.
        #[arg(long = "option", required = true)]
        options: Vec<String>,
    },
    /// Send a sticker by URL or base64.
    SendSticker {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        to: String,
        #[arg(long)]
        sticker: String,
    },
    /// React to a message.
    SendReaction {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        remote_jid: String,
        #[arg(long)]
        message_id: String,
        #[arg(long, default_value_t = false)]
        from_me: bool,
        /// Emoji; empty removes the reaction.
        #[arg(long, default_value = "")]
        reaction: String,
    },
    /// Send a voice note by URL or base64.
    SendAudio {
        #[command(flatten)]
        instance: InstanceArg,
        #[arg(long)]
        to: String,
        #[arg(long)]
        audio: String,
    },
    /// Instance management.
    Instance {
        #[command(subcommand)]
        action: InstanceAction,
    },
}

#[derive(Subcommand)]
enum InstanceAction {
    /// List instances.
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Create an instance.
    Create {
        name: String,
        #[arg(long, value_enum, default_value_t = IntegrationArg::Baileys)]
        integration: IntegrationArg,
        /// Do not ask the gateway for a QR code.
        #[arg(long, default_value_t = false)]
        no_qrcode: bool,
    },
    /// Fetch a QR code, or a pairing code when `--number` is given.
    Connect {
        name: String,
        #[arg(long)]
        number: Option<String>,
    },
    Restart {
        name: String,
    },
    Logout {
        name: String,
    },
    Delete {
        name: String,
    },
    /// Show the connection state.
    State {
        name: String,
    },
    /// Set the presence shown to contacts.
    Presence {
        name: String,
        #[arg(value_enum)]
        presence: PresenceArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum IntegrationArg {
    Baileys,
    Business,
    Evolution,
}

impl From<IntegrationArg> for Integration {
    fn from(arg: IntegrationArg) -> Self {
        match arg {
            IntegrationArg::Baileys => Self::WhatsappBaileys,
            IntegrationArg::Business => Self::WhatsappBusiness,
            IntegrationArg::Evolution => Self::Evolution,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PresenceArg {
    Available,
    Unavailable,
}

impl From<PresenceArg> for Presence {
    fn from(arg: PresenceArg) -> Self {
        match arg {
            PresenceArg::Available => Self::Available,
            PresenceArg::Unavailable => Self::Unavailable,
        }
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout is reserved for command output.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = GatewayConfig::from_raw(
        cli.base_url.as_deref(),
        cli.api_key.as_deref(),
        cli.timeout_secs,
    )
    .context("invalid gateway settings")?;
    let client = EvolutionClient::from_config(&config)?;
    debug!(base_url = config.base_url.as_str(), "gateway configured");

    match cli.command {
        Commands::Bulk {
            instance,
            numbers,
            text,
            delay_ms,
            validate,
        } => {
            let request = BulkRequest {
                instance: instance_name(instance)?,
                numbers: numbers.read()?,
                text: MessageText::new(text)?,
                delay: Duration::from_millis(delay_ms),
                validate,
            };
            let command = BulkCommand::new(Arc::new(client));
            return Ok(match command.run(&request).await {
                RunOutcome::Completed(report) => {
                    println!("{report}");
                    if report.has_failures() {
                        ExitCode::FAILURE
                    } else {
                        ExitCode::SUCCESS
                    }
                }
                RunOutcome::NoCandidates => ExitCode::FAILURE,
                RunOutcome::Busy => ExitCode::FAILURE,
            });
        }
        Commands::SendText { instance, to, text } => {
            let request = SendText::new(RecipientId::new(to)?, MessageText::new(text)?);
            let response = client.send_text(&instance_name(instance)?, &request).await?;
            print_response(&response)?;
        }
        Commands::CheckNumbers { instance, numbers } => {
            let instance = instance_name(instance)?;
            let candidates = CandidateSet::parse(&numbers.read()?);
            let progress = TracingProgress;
            if candidates.duplicates() > 0 {
                progress.duplicates_removed(candidates.duplicates());
            }
            if candidates.is_empty() {
                progress.no_candidates();
                return Ok(ExitCode::FAILURE);
            }
            let report = check_numbers(&client, &instance, &candidates).await?;
            println!("{report}");
        }
        Commands::SendLocation {
            instance,
            to,
            name,
            address,
            latitude,
            longitude,
        } => {
            let request =
                SendLocation::new(RecipientId::new(to)?, name, address, latitude, longitude)?;
            let response = client
                .send_location(&instance_name(instance)?, &request)
                .await?;
            print_response(&response)?;
        }
        Commands::SendContact {
            instance,
            to,
            full_name,
            wuid,
            phone_number,
            organization,
            email,
            url,
        } => {
            let mut card = ContactCard::new(full_name, wuid, phone_number)?;
            card.organization = organization;
            card.email = email;
            card.url = url;
            let request = SendContact::new(RecipientId::new(to)?, vec![card])?;
            let response = client
                .send_contact(&instance_name(instance)?, &request)
                .await?;
            print_response(&response)?;
        }
        Commands::SendPoll {
            instance,
            to,
            name,
            selectable_count,
            options,
        } => {
            let request = SendPoll::new(RecipientId::new(to)?, name, selectable_count, options)?;
            let response = client.send_poll(&instance_name(instance)?, &request).await?;
            print_response(&response)?;
        }
        Commands::SendSticker {
            instance,
            to,
            sticker,
        } => {
            let request = SendMediaRef::new(RecipientId::new(to)?, sticker)?;
            let response = client
                .send_sticker(&instance_name(instance)?, &request)
                .await?;
            print_response(&response)?;
        }
        Commands::SendReaction {
            instance,
            remote_jid,
            message_id,
            from_me,
            reaction,
        } => {
            let key = MessageKey::new(remote_jid, from_me, message_id)?;
            let request = SendReaction::new(key, reaction);
            let response = client
                .send_reaction(&instance_name(instance)?, &request)
                .await?;
            print_response(&response)?;
        }
        Commands::SendAudio {
            instance,
            to,
            audio,
        } => {
            let request = SendMediaRef::new(RecipientId::new(to)?, audio)?;
            let response = client
                .send_whatsapp_audio(&instance_name(instance)?, &request)
                .await?;
            print_response(&response)?;
        }
        Commands::Instance { action } => run_instance_action(&client, action).await?,
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_instance_action(
    client: &EvolutionClient,
    action: InstanceAction,
) -> anyhow::Result<()> {
    match action {
        InstanceAction::List { name, id } => {
            let filter = FetchInstances {
                instance_name: name.map(InstanceName::new).transpose()?,
                instance_id: id,
            };
            for instance in client.fetch_instances(&filter).await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    instance.name,
                    instance.id,
                    instance.connection_status.as_deref().unwrap_or("unknown"),
                    instance.owner_jid.as_deref().unwrap_or_default()
                );
            }
        }
        InstanceAction::Create {
            name,
            integration,
            no_qrcode,
        } => {
            let request = CreateInstance::new(InstanceName::new(name)?)
                .integration(integration.into())
                .qrcode(!no_qrcode);
            print_response(&client.create_instance(&request).await?)?;
        }
        InstanceAction::Connect { name, number } => {
            let number = number.map(RecipientId::new).transpose()?;
            match client
                .instance_connect(&InstanceName::new(name)?, number.as_ref())
                .await?
            {
                ConnectCode::QrCode(qr) => println!("{qr}"),
                ConnectCode::PairingCode(code) => println!("pairing code: {code}"),
            }
        }
        InstanceAction::Restart { name } => {
            print_response(&client.instance_restart(&InstanceName::new(name)?).await?)?;
        }
        InstanceAction::Logout { name } => {
            print_response(&client.instance_logout(&InstanceName::new(name)?).await?)?;
        }
        InstanceAction::Delete { name } => {
            let name = InstanceName::new(name)?;
            print_response(&client.instance_delete(&name).await?)?;
            info!(instance = name.as_str(), "instance deleted");
        }
        InstanceAction::State { name } => {
            let state = client.connection_state(&InstanceName::new(name)?).await?;
            println!("{}\t{}", state.instance, state.state);
        }
        InstanceAction::Presence { name, presence } => {
            let response = client
                .set_presence(&InstanceName::new(name)?, presence.into())
                .await?;
            print_response(&response)?;
        }
    }
    Ok(())
}

fn instance_name(arg: InstanceArg) -> Result<InstanceName, evoapi::ValidationError> {
    InstanceName::new(arg.instance)
}

fn read_numbers(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading numbers from standard input")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading numbers from {}", path.display()))
    }
}

fn print_response(response: &ApiResponse) -> Result<(), serde_json::Error> {
    match response {
        ApiResponse::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ApiResponse::Text(text) if text.is_empty() => {}
        ApiResponse::Text(text) => println!("{text}"),
    }
    Ok(())
}
