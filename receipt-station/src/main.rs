use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use receipt_printer::{
    CodePage, DirectChannel, EscPosBuilder, NetworkPrintService, SerialChannel, TcpChannel,
    TerminalBell,
};
use receipt_station::{Config, PrintDispatcher, format, load_request, logger};
use shared::settings::PrinterKind;
use shared::{
    JsonFileStore, MAX_COPIES, PaperWidth, PrinterSettings, TransportTarget, UserSettings,
    Verbosity,
};

#[derive(Parser)]
#[command(name = "receipt-station", version, about = "Format and print checkout receipts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format a cart file and write the receipt text to stdout
    Preview(CartArgs),
    /// Format a cart file and send it to the printer
    Print {
        #[command(flatten)]
        cart: CartArgs,
        /// Print over raw TCP (host:port) instead of the serial port
        #[arg(long)]
        tcp: Option<String>,
        /// Character table for the direct channel
        #[arg(long, value_enum, default_value_t = CodePageArg::Cp1256)]
        code_page: CodePageArg,
    },
    /// Print a printer test page over the direct channel
    TestPage {
        #[arg(long)]
        tcp: Option<String>,
        #[arg(long, value_enum, default_value_t = CodePageArg::Cp1256)]
        code_page: CodePageArg,
    },
    /// Show or change persisted settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args)]
struct CartArgs {
    /// Cart JSON: `{"lineItems": [...], "total": 19.0, ...}`
    cart: PathBuf,
    /// Override the paper width in millimeters
    #[arg(long)]
    width: Option<u32>,
    /// Override the verbosity (compact, standard, detailed)
    #[arg(long)]
    verbosity: Option<Verbosity>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    SetPrinter {
        #[arg(long, value_enum)]
        kind: Option<PrinterArg>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        format: Option<Verbosity>,
        #[arg(long)]
        copies: Option<u32>,
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        auto_print: Option<bool>,
    },
    SetUser {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        position: Option<String>,
        /// Show the cashier block on receipts
        #[arg(long)]
        show: Option<bool>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CodePageArg {
    /// Windows-1256 (Arabic)
    Cp1256,
    /// Windows-1252 (Western European)
    Cp1252,
}

impl From<CodePageArg> for CodePage {
    fn from(arg: CodePageArg) -> Self {
        match arg {
            CodePageArg::Cp1256 => CodePage::Wpc1256,
            CodePageArg::Cp1252 => CodePage::Wpc1252,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PrinterArg {
    Thermal,
    Serial,
    System,
}

impl From<PrinterArg> for PrinterKind {
    fn from(arg: PrinterArg) -> Self {
        match arg {
            PrinterArg::Thermal => PrinterKind::Thermal,
            PrinterArg::Serial => PrinterKind::Serial,
            PrinterArg::System => PrinterKind::System,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    let cli = Cli::parse();
    let store = JsonFileStore::new(&config.settings_path);

    match cli.command {
        Command::Preview(args) => {
            let printer = PrinterSettings::load(&store)?;
            let user = UserSettings::load(&store)?;
            let text = render(&args, &printer, &user)?;
            print!("{}", text);
        }
        Command::Print {
            cart,
            tcp,
            code_page,
        } => {
            let printer = PrinterSettings::load(&store)?;
            let user = UserSettings::load(&store)?;
            let request = request_for(&cart, &printer, &user)?;
            let text = format(&request);

            let mut profile = request.layout.clone();
            let direct = direct_channel(&config, tcp.as_deref())?;
            if tcp.is_some() {
                profile.transport = TransportTarget::DirectChannel;
            }

            let mut dispatcher = PrintDispatcher::new()
                .with_timeout(config.print_timeout())
                .with_code_page(code_page.into())
                .with_tone(Box::new(TerminalBell));
            if let Some(channel) = direct {
                dispatcher = dispatcher.with_direct_channel(channel);
            }
            match NetworkPrintService::with_timeout(
                &printer.thermal_printer_ip,
                printer.thermal_printer_port,
                config.print_timeout(),
            ) {
                Ok(service) => dispatcher = dispatcher.with_network_service(service),
                Err(e) => tracing::warn!(error = %e, "Network print service not configured"),
            }

            let outcome = dispatcher.print(&text, &profile).await;
            tracing::debug!(states = ?outcome.states, "print finished");
            let delivery = outcome.into_result()?;
            println!("Printed via {:?}", delivery);
        }
        Command::TestPage { tcp, code_page } => {
            let printer = PrinterSettings::load(&store)?;
            let Some(channel) = direct_channel(&config, tcp.as_deref())? else {
                bail!(
                    "No direct channel: set SERIAL_PORT or pass --tcp (serial ports: {})",
                    port_list()
                );
            };
            if !channel.is_online().await {
                bail!(
                    "{} is not reachable (serial ports: {})",
                    channel.describe(),
                    port_list()
                );
            }
            let page = test_page(
                PaperWidth::from_mm(printer.receipt_width),
                code_page.into(),
                printer.enable_sound,
            );
            channel.send(&page).await?;
            println!("Test page sent to {}", channel.describe());
        }
        Command::Settings(cmd) => settings(&store, cmd)?,
    }

    Ok(())
}

fn request_for(
    args: &CartArgs,
    printer: &PrinterSettings,
    user: &UserSettings,
) -> anyhow::Result<shared::ReceiptRequest> {
    let mut request = load_request(&args.cart, &printer.to_layout_profile())?;
    if let Some(width) = args.width {
        request.layout.paper_width_millimeters = width;
    }
    if let Some(verbosity) = args.verbosity {
        request.layout.verbosity = verbosity;
    }
    if request.cashier.is_none() {
        request.cashier = user.to_cashier_info();
    }
    Ok(request)
}

fn render(args: &CartArgs, printer: &PrinterSettings, user: &UserSettings) -> anyhow::Result<String> {
    Ok(format(&request_for(args, printer, user)?))
}

fn direct_channel(config: &Config, tcp: Option<&str>) -> anyhow::Result<Option<Arc<dyn DirectChannel>>> {
    if let Some(addr) = tcp {
        let channel = TcpChannel::from_addr(addr)?.with_timeout(config.print_timeout());
        return Ok(Some(Arc::new(channel)));
    }
    Ok(config.serial_port.as_ref().map(|path| {
        Arc::new(SerialChannel::new(path.clone()).with_timeout(config.print_timeout()))
            as Arc<dyn DirectChannel>
    }))
}

fn port_list() -> String {
    let ports = SerialChannel::available_ports();
    if ports.is_empty() {
        "none".to_string()
    } else {
        ports.join(", ")
    }
}

fn test_page(paper: PaperWidth, page: CodePage, buzzer: bool) -> Vec<u8> {
    let mut b = EscPosBuilder::new(paper.columns());
    b.code_page(page)
        .center()
        .double_size()
        .line("اختبار الطابعة")
        .reset_size()
        .line("PRINTER TEST")
        .left()
        .sep_double();
    let columns = b.width().to_string();
    b.line_lr("Paper", &paper.to_string())
        .line_lr("Columns", &columns)
        .line_lr("Code page", page.encoding().name())
        .sep_single()
        .bold()
        .line("0123456789 ABC abc")
        .bold_off()
        .line("أ ب ت ث ج ح خ د ذ ر ز س ش")
        .feed(1);
    if buzzer {
        b.buzzer(1, 2);
    }
    b.cut_feed(4);
    b.build()
}

fn settings(store: &JsonFileStore, cmd: SettingsCommand) -> anyhow::Result<()> {
    match cmd {
        SettingsCommand::Show => {
            let printer = PrinterSettings::load(store)?;
            let user = UserSettings::load(store)?;
            let json = serde_json::json!({
                "printerSettings": printer,
                "userSettings": user,
                "serialPorts": SerialChannel::available_ports(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        SettingsCommand::SetPrinter {
            kind,
            ip,
            port,
            width,
            format,
            copies,
            sound,
            auto_print,
        } => {
            let mut s = PrinterSettings::load(store)?;
            if let Some(kind) = kind {
                s.default_printer = kind.into();
            }
            if let Some(ip) = ip {
                s.thermal_printer_ip = ip;
            }
            if let Some(port) = port {
                s.thermal_printer_port = port;
            }
            if let Some(width) = width {
                s.receipt_width = width;
            }
            if let Some(format) = format {
                s.receipt_format = format;
            }
            if let Some(copies) = copies {
                s.print_copies = copies.clamp(1, MAX_COPIES);
            }
            if let Some(sound) = sound {
                s.enable_sound = sound;
            }
            if let Some(auto_print) = auto_print {
                s.auto_print = auto_print;
            }
            s.save(store).context("saving printer settings")?;
        }
        SettingsCommand::SetUser {
            name,
            phone,
            email,
            position,
            show,
        } => {
            let mut u = UserSettings::load(store)?;
            if let Some(name) = name {
                u.user_name = name;
            }
            if let Some(phone) = phone {
                u.user_phone = phone;
            }
            if let Some(email) = email {
                u.user_email = email;
            }
            if let Some(position) = position {
                u.user_position = position;
            }
            if let Some(show) = show {
                u.show_user_info_on_receipt = show;
            }
            u.save(store).context("saving user settings")?;
        }
    }
    Ok(())
}
