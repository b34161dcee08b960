//! Application state and logic

use std::time::Instant;

use hafizly_core::{
    filter_links, AccessGate, CategoryFilter, Config, Link, LinkDraft, PasscodeVault,
};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Public,
    Private,
    Settings,
}

impl Tab {
    /// Move to the next tab (wrapping)
    pub fn next(self) -> Self {
        match self {
            Tab::Public => Tab::Private,
            Tab::Private => Tab::Settings,
            Tab::Settings => Tab::Public,
        }
    }

    /// Move to the previous tab (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Tab::Public => Tab::Settings,
            Tab::Private => Tab::Public,
            Tab::Settings => Tab::Private,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Public => "Public",
            Tab::Private => "Private",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Public => 0,
            Tab::Private => 1,
            Tab::Settings => 2,
        }
    }

    /// The fixed category filter of this screen
    pub fn category_filter(self) -> CategoryFilter {
        match self {
            Tab::Public => CategoryFilter::Public,
            Tab::Private => CategoryFilter::Private,
            Tab::Settings => CategoryFilter::All,
        }
    }
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Live search (after pressing /)
    Search,
    /// Add/Edit modal form
    Form,
    /// Passcode prompt guarding the Private tab
    Passcode,
    /// Passcode change form on the Settings tab
    Settings,
}

/// Fields of the add/edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Url,
    Visibility,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::Url,
            FormField::Url => FormField::Visibility,
            FormField::Visibility => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Visibility,
            FormField::Description => FormField::Name,
            FormField::Url => FormField::Description,
            FormField::Visibility => FormField::Url,
        }
    }
}

/// State of the add/edit modal
#[derive(Debug, Clone)]
pub struct LinkForm {
    pub name: String,
    pub description: String,
    pub url: String,
    pub is_public: bool,
    pub field: FormField,
    /// Some(id) when editing an existing link
    pub editing: Option<i64>,
}

impl LinkForm {
    /// An empty form for a new link
    pub fn add(is_public: bool) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            url: String::new(),
            is_public,
            field: FormField::Name,
            editing: None,
        }
    }

    /// A form pre-filled from an existing link
    pub fn edit(link: &Link) -> Self {
        Self {
            name: link.name.clone(),
            description: link.description.clone().unwrap_or_default(),
            url: link.url.clone(),
            is_public: link.is_public(),
            field: FormField::Name,
            editing: Some(link.id),
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Link"
        } else {
            "Add New Link"
        }
    }

    /// The draft this form currently describes
    pub fn draft(&self) -> LinkDraft {
        LinkDraft::new(
            self.name.clone(),
            self.description.clone(),
            self.url.clone(),
            self.is_public,
        )
    }

    /// The text buffer of the active field, if it has one
    pub fn active_buffer_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Name => Some(&mut self.name),
            FormField::Description => Some(&mut self.description),
            FormField::Url => Some(&mut self.url),
            FormField::Visibility => None,
        }
    }
}

/// Which field of the settings form is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Passcode,
    Confirm,
}

impl SettingsField {
    pub fn other(self) -> Self {
        match self {
            SettingsField::Passcode => SettingsField::Confirm,
            SettingsField::Confirm => SettingsField::Passcode,
        }
    }
}

/// Passcode entry + confirmation on the Settings tab
#[derive(Debug, Clone, Default)]
pub struct PasscodeForm {
    pub passcode: String,
    pub confirm: String,
    pub field: SettingsField,
}

impl PasscodeForm {
    pub fn active_buffer_mut(&mut self) -> &mut String {
        match self.field {
            SettingsField::Passcode => &mut self.passcode,
            SettingsField::Confirm => &mut self.confirm,
        }
    }

    pub fn clear(&mut self) {
        self.passcode.clear();
        self.confirm.clear();
        self.field = SettingsField::Passcode;
    }
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Config,
    /// Passcode storage
    pub vault: PasscodeVault,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Which screen is showing
    pub tab: Tab,
    /// Current input mode
    pub input_mode: InputMode,
    /// Live search text for the current screen
    pub search_text: String,
    /// Add/Edit modal, when open
    pub form: Option<LinkForm>,
    /// Settings passcode form
    pub passcode_form: PasscodeForm,
    /// Input buffer for the Private tab's passcode prompt
    pub passcode_input: String,
    /// Gate over the Private screen
    pub gate: AccessGate,
    /// Currently selected link index (into the visible list)
    pub link_index: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Blocking error message, shown as a modal
    pub error_message: Option<String>,
    /// Whether a remote call is in flight
    pub is_loading: bool,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    pub fn new(config: Config, vault: PasscodeVault) -> Self {
        Self {
            config,
            vault,
            should_quit: false,
            tab: Tab::Public,
            input_mode: InputMode::Normal,
            search_text: String::new(),
            form: None,
            passcode_form: PasscodeForm::default(),
            passcode_input: String::new(),
            gate: AccessGate::Locked,
            link_index: 0,
            status_message: None,
            status_message_time: None,
            error_message: None,
            is_loading: false,
            show_help: false,
        }
    }

    // ==================== Derived views ====================

    /// The links the current screen shows
    ///
    /// Recomputed from the snapshot on every call: category membership
    /// first, then the live search term. A locked Private screen shows
    /// nothing.
    pub fn visible_links<'a>(&self, links: &'a [Link]) -> Vec<&'a Link> {
        match self.tab {
            Tab::Settings => Vec::new(),
            Tab::Private if !self.gate.is_unlocked() => Vec::new(),
            tab => filter_links(links, tab.category_filter(), &self.search_text),
        }
    }

    /// The currently selected link
    pub fn current_link<'a>(&self, links: &'a [Link]) -> Option<&'a Link> {
        self.visible_links(links).get(self.link_index).copied()
    }

    // ==================== Navigation ====================

    pub fn move_up(&mut self) {
        if self.link_index > 0 {
            self.link_index -= 1;
        }
    }

    pub fn move_down(&mut self, visible_len: usize) {
        if visible_len > 0 && self.link_index < visible_len - 1 {
            self.link_index += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.link_index = 0;
    }

    pub fn move_to_last(&mut self, visible_len: usize) {
        self.link_index = visible_len.saturating_sub(1);
    }

    /// Keep the selection inside the visible list after it changes
    pub fn clamp_selection(&mut self, visible_len: usize) {
        if self.link_index >= visible_len {
            self.link_index = visible_len.saturating_sub(1);
        }
    }

    /// Switch screens
    ///
    /// Leaving the Private tab locks the gate again; entering it with a
    /// passcode set opens the prompt.
    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab == Tab::Private && tab != Tab::Private {
            self.gate.lock();
        }

        self.tab = tab;
        self.link_index = 0;
        self.search_text.clear();
        self.input_mode = InputMode::Normal;

        if tab == Tab::Private && !self.gate.is_unlocked() {
            if self.vault.is_set() {
                self.passcode_input.clear();
                self.input_mode = InputMode::Passcode;
            } else {
                // No passcode stored, the gate opens freely
                let _ = self.gate.unlock(&self.vault, "");
            }
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.tab.prev());
    }

    // ==================== Passcode gate ====================

    /// Try the entered passcode against the vault
    pub fn submit_passcode(&mut self) {
        let input = std::mem::take(&mut self.passcode_input);
        match self.gate.unlock(&self.vault, &input) {
            Ok(true) => {
                self.input_mode = InputMode::Normal;
            }
            Ok(false) => {
                self.set_status("Authentication failed");
            }
            Err(e) => {
                self.set_error(e.to_string());
            }
        }
    }

    /// Abandon the passcode prompt and return to the Public screen
    pub fn cancel_passcode(&mut self) {
        self.passcode_input.clear();
        self.select_tab(Tab::Public);
    }

    // ==================== Forms ====================

    /// Open the add form; the visibility default follows the screen
    pub fn open_add_form(&mut self) {
        let is_public = self.tab != Tab::Private;
        self.form = Some(LinkForm::add(is_public));
        self.input_mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self, link: &Link) {
        self.form = Some(LinkForm::edit(link));
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Apply the settings form to the vault
    pub fn submit_settings(&mut self) {
        match self
            .vault
            .store(&self.passcode_form.passcode, &self.passcode_form.confirm)
        {
            Ok(()) => {
                self.passcode_form.clear();
                self.input_mode = InputMode::Normal;
                self.set_status("Password set successfully");
            }
            Err(e) => {
                // Leave the form open for another attempt
                self.set_status(e.to_string());
            }
        }
    }

    // ==================== Messages ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > std::time::Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Show a blocking error modal
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hafizly_core::Category;
    use tempfile::TempDir;

    fn test_app(temp_dir: &TempDir) -> App {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let vault = PasscodeVault::new(temp_dir.path().join("passcode"));
        App::new(config, vault)
    }

    fn link(id: i64, name: &str, category: Category) -> Link {
        Link {
            id,
            name: name.to_string(),
            description: None,
            url: format!("https://example.com/{}", id),
            category,
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Link> {
        vec![
            link(1, "Docs", Category::Public),
            link(2, "Bank", Category::Private),
            link(3, "News", Category::Public),
        ]
    }

    #[test]
    fn test_public_tab_shows_only_public_links() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir);
        let links = sample();

        let visible = app.visible_links(&links);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|l| l.is_public()));
    }

    #[test]
    fn test_locked_private_tab_shows_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        app.vault.store("secret", "secret").unwrap();
        let links = sample();

        app.select_tab(Tab::Private);
        assert_eq!(app.input_mode, InputMode::Passcode);
        assert!(app.visible_links(&links).is_empty());
    }

    #[test]
    fn test_private_tab_opens_freely_without_passcode() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let links = sample();

        app.select_tab(Tab::Private);
        assert_eq!(app.input_mode, InputMode::Normal);
        let visible = app.visible_links(&links);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn test_unlock_then_leave_relocks() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        app.vault.store("secret", "secret").unwrap();

        app.select_tab(Tab::Private);
        app.passcode_input = "secret".to_string();
        app.submit_passcode();
        assert!(app.gate.is_unlocked());
        assert_eq!(app.input_mode, InputMode::Normal);

        // Leaving the screen locks it again
        app.select_tab(Tab::Public);
        assert!(!app.gate.is_unlocked());

        // Coming back requires the passcode anew
        app.select_tab(Tab::Private);
        assert_eq!(app.input_mode, InputMode::Passcode);
    }

    #[test]
    fn test_wrong_passcode_stays_locked() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        app.vault.store("secret", "secret").unwrap();

        app.select_tab(Tab::Private);
        app.passcode_input = "wrong".to_string();
        app.submit_passcode();

        assert!(!app.gate.is_unlocked());
        assert_eq!(app.status_message.as_deref(), Some("Authentication failed"));
    }

    #[test]
    fn test_search_narrows_visible_links() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let links = sample();

        app.search_text = "docs".to_string();
        let visible = app.visible_links(&links);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Docs");
    }

    #[test]
    fn test_tab_switch_resets_search_and_selection() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.search_text = "docs".to_string();
        app.link_index = 1;
        app.select_tab(Tab::Settings);

        assert!(app.search_text.is_empty());
        assert_eq!(app.link_index, 0);
    }

    #[test]
    fn test_form_field_cycle() {
        let mut form = LinkForm::add(true);
        assert_eq!(form.field, FormField::Name);
        form.field = form.field.next();
        assert_eq!(form.field, FormField::Description);
        form.field = form.field.next().next().next();
        assert_eq!(form.field, FormField::Name);
        form.field = form.field.prev();
        assert_eq!(form.field, FormField::Visibility);
        assert!(form.active_buffer_mut().is_none());
    }

    #[test]
    fn test_add_form_defaults_visibility_to_screen() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.open_add_form();
        assert!(app.form.as_ref().unwrap().is_public);
        app.close_form();

        app.select_tab(Tab::Private);
        app.open_add_form();
        assert!(!app.form.as_ref().unwrap().is_public);
    }

    #[test]
    fn test_edit_form_prefills_from_link() {
        let source = link(7, "Docs", Category::Private);
        let form = LinkForm::edit(&source);

        assert_eq!(form.name, "Docs");
        assert_eq!(form.url, "https://example.com/7");
        assert!(!form.is_public);
        assert_eq!(form.editing, Some(7));

        let draft = form.draft();
        assert_eq!(draft.name, "Docs");
        assert!(!draft.is_public);
    }

    #[test]
    fn test_settings_mismatch_keeps_form_open() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        app.input_mode = InputMode::Settings;

        app.passcode_form.passcode = "one".to_string();
        app.passcode_form.confirm = "two".to_string();
        app.submit_settings();

        assert_eq!(app.input_mode, InputMode::Settings);
        assert_eq!(app.status_message.as_deref(), Some("Passwords do not match"));
        assert!(!app.vault.is_set());
    }

    #[test]
    fn test_settings_submit_stores_passcode() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        app.input_mode = InputMode::Settings;

        app.passcode_form.passcode = "secret".to_string();
        app.passcode_form.confirm = "secret".to_string();
        app.submit_settings();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Password set successfully")
        );
        assert!(app.vault.is_set());
    }

    #[test]
    fn test_selection_clamps_to_visible() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.link_index = 5;
        app.clamp_selection(2);
        assert_eq!(app.link_index, 1);

        app.clamp_selection(0);
        assert_eq!(app.link_index, 0);
    }
}
