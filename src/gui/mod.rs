/// ICED GUI Application Module
///
/// Architecture:
/// - The window owns one `InstallSession`; nothing lives in globals
/// - The catalog is recomputed whenever the directory or architecture changes
/// - While an installer runs, a subscription ticks at the configured interval
///   and each tick performs one non-blocking poll
pub mod assets;
pub mod dialogs;

use crate::activity::ActivityLog;
use crate::catalog::{list_candidates, Architecture, CandidateSet};
use crate::config::AppConfig;
use crate::launcher::{InstallSession, LaunchDescriptor, LaunchError, ProcessStatus};
use dialogs::Notice;
use iced::{
    executor,
    widget::{
        image, Button, Column, Container, Image, PickList, Radio, Row, Scrollable, Space, Text,
        TextInput,
    },
    Alignment, Application, Command, ContentFit, Element, Length, Settings, Subscription, Theme,
};
use std::path::PathBuf;

const HEADER_HEIGHT: f32 = 120.0;

#[derive(Debug, Clone)]
pub enum Message {
    BrowseDirectory,
    ArchitectureSelected(Architecture),
    ConfigSelected(String),
    StartInstallation,
    PollTick,
}

/// Startup flags for the GUI application
#[derive(Debug, Clone, Default)]
pub struct GuiFlags {
    pub config: AppConfig,
    pub work_dir: PathBuf,
    pub architecture: Architecture,
    /// Show native dialogs for notices (off in tests)
    pub interactive: bool,
}

pub struct OfficeInstaller {
    config: AppConfig,
    work_dir: PathBuf,
    architecture: Architecture,
    candidates: CandidateSet,
    selected: Option<String>,
    session: InstallSession,
    activity: ActivityLog,
    banner: Option<image::Handle>,
    interactive: bool,

    // Last notice, also shown in the status bar
    notice: Option<Notice>,
}

impl OfficeInstaller {
    fn refresh_candidates(&mut self) {
        self.candidates = list_candidates(
            &self.work_dir,
            self.architecture,
            &self.config.catalog_rules(),
        );
        self.selected = self.candidates.default_selection().map(str::to_string);
    }

    fn notify(&mut self, notice: Notice) {
        if self.interactive {
            notice.show();
        }
        self.notice = Some(notice);
    }

    fn can_start(&self) -> bool {
        self.candidates.can_launch() && self.selected.is_some() && !self.session.is_running()
    }

    fn browse_directory(&mut self) {
        if let Some(new_dir) = dialogs::pick_directory(&self.work_dir) {
            self.change_directory(new_dir);
        }
    }

    fn change_directory(&mut self, new_dir: PathBuf) {
        self.work_dir = new_dir;
        self.refresh_candidates();
        self.activity
            .log(format!("Diretório alterado para: {}", self.work_dir.display()));
    }

    fn start_installation(&mut self) {
        let Some(config_name) = self.selected.clone() else {
            return;
        };

        let descriptor = LaunchDescriptor::resolve(
            &self.work_dir,
            &self.config.executable_name,
            &config_name,
        );

        // The attempted command is logged even when the spawn itself fails
        let outcome = descriptor.check().and_then(|()| {
            self.activity
                .log(format!("Iniciando: {}", descriptor.command_line()));
            self.activity.log("Aguardando processo...");
            self.session.start(&descriptor)
        });

        match outcome {
            Ok(pid) => {
                self.activity
                    .log("Processo iniciado! Verifique a janela do Office.");
                self.activity.log(format!("PID: {}", pid));
                self.notice = None;
            }
            Err(LaunchError::MissingExecutable(path)) => {
                tracing::warn!("Installer missing: {:?}", path);
                self.notify(Notice::error(
                    "Erro",
                    missing_executable_message(&self.config.executable_name, &self.work_dir),
                ));
            }
            Err(LaunchError::InvalidConfig(path)) => {
                tracing::warn!("Configuration missing: {:?}", path);
                self.notify(Notice::warning("Aviso", "Arquivo XML inválido."));
            }
            Err(e) => {
                self.activity.error(format!("Erro Crítico: {}", e));
            }
        }
    }

    fn poll_installation(&mut self) {
        match self.session.poll() {
            Ok(Some(ProcessStatus::Completed(code))) => {
                self.activity.log(format!(
                    "Processo finalizado com código: {}",
                    exit_code_text(code)
                ));
                self.notify(Notice::info(
                    "Concluído",
                    "O processo de instalação foi finalizado.",
                ));
            }
            Ok(Some(ProcessStatus::Running)) | Ok(None) => {}
            Err(e) => {
                self.activity.error(format!("Erro Crítico: {}", e));
            }
        }
    }

    fn render_header(&self) -> Element<Message> {
        let content: Element<Message> = match &self.banner {
            Some(handle) => Image::new(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(HEADER_HEIGHT))
                .content_fit(ContentFit::Cover)
                .into(),
            None => Text::new("OFFICE INSTALLER").size(24).into(),
        };

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fixed(HEADER_HEIGHT))
            .center_x()
            .center_y()
            .into()
    }

    fn render_architecture(&self) -> Element<Message> {
        Architecture::CHOICES
            .iter()
            .fold(Row::new().spacing(20), |row, arch| {
                row.push(Radio::new(
                    arch.label(),
                    *arch,
                    Some(self.architecture),
                    Message::ArchitectureSelected,
                ))
            })
            .into()
    }

    fn render_log(&self) -> Element<Message> {
        let lines = self
            .activity
            .entries()
            .iter()
            .fold(Column::new().spacing(2), |col, line| {
                col.push(Text::new(line).size(13))
            });

        Container::new(Scrollable::new(lines).height(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(5)
            .into()
    }
}

impl Application for OfficeInstaller {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = GuiFlags;

    fn new(flags: GuiFlags) -> (Self, Command<Message>) {
        let assets_dir = flags.config.assets_dir_or(&flags.work_dir).to_path_buf();
        let banner = assets::banner_path(&assets_dir).map(image::Handle::from_path);

        let mut app = OfficeInstaller {
            config: flags.config,
            work_dir: flags.work_dir,
            architecture: flags.architecture,
            candidates: CandidateSet::default(),
            selected: None,
            session: InstallSession::new(),
            activity: ActivityLog::new(),
            banner,
            interactive: flags.interactive,
            notice: None,
        };
        app.refresh_candidates();

        tracing::info!(
            "Working directory {:?}: {} configuration files",
            app.work_dir,
            app.candidates.total_configs()
        );

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("Instalador Office Pro")
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        // Poll the installer only while one is running
        struct InstallPoller;

        if self.session.is_running() {
            let interval = self.config.poll_interval();
            iced::subscription::unfold(
                std::any::TypeId::of::<InstallPoller>(),
                interval,
                |interval| async move {
                    std::thread::sleep(interval);
                    (Message::PollTick, interval)
                },
            )
        } else {
            Subscription::none()
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::BrowseDirectory => {
                self.browse_directory();
            }

            Message::ArchitectureSelected(arch) => {
                self.architecture = arch;
                self.refresh_candidates();
            }

            Message::ConfigSelected(name) => {
                if self.candidates.contains(&name) {
                    self.selected = Some(name);
                }
            }

            Message::StartInstallation => {
                if self.can_start() {
                    self.start_installation();
                }
            }

            Message::PollTick => {
                self.poll_installation();
            }
        }

        Command::none()
    }

    fn view(&self) -> Element<Message> {
        let work_dir = self.work_dir.display().to_string();

        let directory_row = Row::new()
            .spacing(10)
            .align_items(Alignment::Center)
            .push(TextInput::new("", &work_dir).padding(5).width(Length::Fill))
            .push(
                Button::new(Text::new("Procurar..."))
                    .on_press(Message::BrowseDirectory)
                    .padding(5),
            );

        let placeholder = self
            .candidates
            .empty_state()
            .map(|state| state.message())
            .unwrap_or("");

        let config_list = PickList::new(
            self.candidates.names(),
            self.selected.clone(),
            Message::ConfigSelected,
        )
        .placeholder(placeholder)
        .width(Length::Fill)
        .padding(8);

        let install_button = {
            let button = Button::new(Text::new("INICIAR INSTALAÇÃO").size(16))
                .width(Length::Fill)
                .padding(14);
            if self.can_start() {
                button.on_press(Message::StartInstallation)
            } else {
                button
            }
        };

        let mut content = Column::new()
            .spacing(10)
            .padding(20)
            .push(Text::new("Pasta dos Arquivos (Setup e XML):").size(14))
            .push(directory_row)
            .push(Text::new("Arquitetura:").size(14))
            .push(self.render_architecture())
            .push(Text::new("Selecione a Configuração:").size(14))
            .push(config_list)
            .push(install_button);

        if self.session.is_running() {
            content = content.push(Text::new("⏳ Instalação em andamento...").size(13));
        }

        content = content
            .push(Text::new("Log de Atividade:").size(13))
            .push(self.render_log())
            .push(
                // Status bar
                Row::new()
                    .spacing(20)
                    .push(
                        self.notice
                            .as_ref()
                            .map(|notice| Text::new(notice.text()).size(12))
                            .unwrap_or_else(|| Text::new("").size(12)),
                    )
                    .push(Space::new(Length::Fill, Length::Shrink))
                    .push(Text::new(format!("{} arquivo(s) XML", self.candidates.total_configs())).size(12)),
            );

        Container::new(Column::new().push(self.render_header()).push(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Error shown when the installer executable is not in the working directory
pub fn missing_executable_message(executable_name: &str, work_dir: &std::path::Path) -> String {
    format!(
        "O arquivo '{}' não existe em:\n{}\n\nCertifique-se que o executável está na mesma pasta dos arquivos do Office.",
        executable_name,
        work_dir.display()
    )
}

fn exit_code_text(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "desconhecido".to_string(),
    }
}

pub fn run(flags: GuiFlags) -> iced::Result {
    let assets_dir = flags.config.assets_dir_or(&flags.work_dir).to_path_buf();

    OfficeInstaller::run(Settings {
        flags,
        window: iced::window::Settings {
            size: iced::Size::new(600.0, 600.0),
            min_size: Some(iced::Size::new(480.0, 520.0)),
            icon: assets::load_window_icon(&assets_dir),
            ..Default::default()
        },
        ..Default::default()
    })
}
