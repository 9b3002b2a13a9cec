/// Everything the update loop reacts to, after key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Resize(u16, u16),

    // Text editing
    Input(char),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    NextField,
    PrevField,

    Submit,
    NavigateBack,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,

    ShowSignup,
    OpenHistory,
    ToggleTheme,
    Logout,

    // History screen
    CycleWindow,
    NextPage,
    PrevPage,
    Refresh,

    None,
}
