//! Internationalization (i18n) module.
//!
//! Provides localized strings for CLI output and drop feedback.
//! English is the default language; Spanish is available as an alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from `MAILBOARD_LANG`, then `LC_MESSAGES`, then `LANG`.
pub fn detect_system_lang() -> Lang {
    ["MAILBOARD_LANG", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(app_name, "mailboard", "mailboard");
msg!(
    app_about,
    "Email kanban board: drag-and-drop reconciliation from the terminal",
    "Tablero kanban de correo: reconciliaci\u{f3}n de arrastrar y soltar desde la terminal"
);
msg!(
    app_long_about,
    "mailboard keeps emails organized as cards on a kanban board.\nImport an inbox, replay drag gestures and inspect drag carriers.\nBoards are read from JSON snapshots and never written back.",
    "mailboard organiza correos como tarjetas en un tablero kanban.\nImporta una bandeja, reproduce gestos de arrastre e inspecciona portadores.\nLos tableros se leen de instant\u{e1}neas JSON y nunca se sobrescriben."
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_board,
    "Board snapshot (JSON) to start from. Defaults to the configured columns",
    "Instant\u{e1}nea del tablero (JSON) de partida. Por defecto, las columnas configuradas"
);
msg!(
    help_verbose,
    "Verbose logging (-v info, -vv debug, -vvv trace)",
    "Registro detallado (-v info, -vv debug, -vvv trace)"
);
msg!(
    help_lang,
    "Language (en, es). Defaults to system locale",
    "Idioma (en, es). Por defecto usa el idioma del sistema"
);
msg!(help_output_json, "Output as JSON", "Salida en formato JSON");
msg!(help_cmd_show, "Print the board", "Mostrar el tablero");
msg!(
    help_cmd_import,
    "Import emails as one card each",
    "Importar correos, una tarjeta por correo"
);
msg!(
    help_import_file,
    "JSON file with email records",
    "Fichero JSON con registros de correo"
);
msg!(
    help_import_column,
    "Column that receives the cards (default from config)",
    "Columna que recibe las tarjetas (por defecto, la de la configuraci\u{f3}n)"
);
msg!(
    help_import_gmail,
    "Input holds raw Gmail API messages",
    "La entrada contiene mensajes en bruto de la API de Gmail"
);
msg!(
    help_cmd_replay,
    "Replay a JSON-lines script of drag gestures",
    "Reproducir un guion JSON-lines de gestos de arrastre"
);
msg!(
    help_replay_script,
    "Script file, one gesture per line",
    "Fichero de guion, un gesto por l\u{ed}nea"
);
msg!(
    help_cmd_decode,
    "Decode a drag carrier ('<kind> <json>')",
    "Decodificar un portador de arrastre ('<tipo> <json>')"
);
msg!(
    help_decode_carrier,
    "Carrier in wire form",
    "Portador en formato de transporte"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar completions para tu shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);

// ── Board output ─────────────────────────────────────────────────

msg!(msg_board, "Board", "Tablero");
msg!(msg_columns, "columns", "columnas");
msg!(msg_cards, "cards", "tarjetas");
msg!(msg_emails, "emails", "correos");
msg!(msg_empty_column, "(no cards)", "(sin tarjetas)");
msg!(msg_revision, "Revision", "Revisi\u{f3}n");
msg!(col_card, "Card", "Tarjeta");
msg!(col_subject, "Subject", "Asunto");
msg!(col_emails, "Emails", "Correos");
msg!(col_unread, "Unread", "Sin leer");
msg!(col_priority, "Priority", "Prioridad");
msg!(col_labels, "Labels", "Etiquetas");

// ── CLI strings ─────────────────────────────────────────────────

msg!(cli_imported, "Imported", "Importadas");
msg!(cli_cards_into, "card(s) into", "tarjeta(s) en");
msg!(cli_skipped, "Skipped", "Omitidos");
msg!(
    cli_already_on_board,
    "email(s) already on the board",
    "correo(s) ya en el tablero"
);
msg!(cli_gesture, "Gesture", "Gesto");
msg!(cli_cancelled, "cancelled", "cancelado");
msg!(cli_no_drag, "drop without a drag", "soltar sin arrastre");
msg!(cli_kind, "Kind", "Tipo");
msg!(cli_payload, "Payload", "Contenido");

// ── Errors ───────────────────────────────────────────────────────

msg!(
    err_file_not_found,
    "File not found",
    "Fichero no encontrado"
);
msg!(err_unknown_column, "Unknown column", "Columna desconocida");
msg!(
    err_script_line,
    "Invalid gesture on line",
    "Gesto no v\u{e1}lido en la l\u{ed}nea"
);

// ── Drop feedback ────────────────────────────────────────────────

msg!(fb_card_moved_title, "Card Moved", "Tarjeta movida");
msg!(fb_card, "Card", "Tarjeta");
msg!(fb_moved_to, "moved to", "movida a");
msg!(fb_email_added_title, "Email Added", "Correo a\u{f1}adido");
msg!(fb_email_added, "Email added to", "Correo a\u{f1}adido a");
msg!(fb_card_created_title, "New Card Created", "Nueva tarjeta creada");
msg!(fb_card_created, "New card created in", "Nueva tarjeta creada en");
msg!(fb_email_extracted_title, "Email Extracted", "Correo extra\u{ed}do");
msg!(
    fb_email_extracted,
    "Email extracted to a new card in",
    "Correo extra\u{ed}do a una nueva tarjeta en"
);
msg!(
    fb_duplicate_title,
    "Email Already Exists",
    "El correo ya existe"
);
msg!(
    fb_duplicate,
    "This email is already on the board in",
    "Este correo ya est\u{e1} en el tablero en"
);
msg!(fb_not_found_title, "Drop Ignored", "Soltar ignorado");
msg!(
    fb_not_found,
    "The drop target or the dragged item no longer exists",
    "El destino o el elemento arrastrado ya no existe"
);
msg!(fb_rejected_title, "Not Allowed", "No permitido");
msg!(
    fb_rejected,
    "A card must keep at least one email",
    "Una tarjeta debe conservar al menos un correo"
);
msg!(fb_malformed_title, "Drop Failed", "Error al soltar");
msg!(
    fb_malformed,
    "The dragged data could not be read",
    "No se pudieron leer los datos arrastrados"
);
