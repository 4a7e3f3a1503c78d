// Events for the console simulator loop. The real USSD gateway delivers one
// message per session step; here each stdin line plays that role.
pub enum Event {
    /// One line typed at the console (a single USSD reply).
    Input { content: String },

    /// Ctrl+C or stdin closed.
    Shutdown,
}
