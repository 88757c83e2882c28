/// What a client operation does when the network call or decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Return the error to the caller.
    Propagate,
    /// Log it and return an empty/default value.
    ReturnDefault,
    /// Serve the cached blob from local storage instead.
    ReadLocalCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    SaveEntry,
    DeleteEntry,
    GetAllEntries,
    GetEntry,
    GetLastNDays,
    CalculateStreak,
    GetEntriesWithFallback,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Register,
        Operation::Login,
        Operation::SaveEntry,
        Operation::DeleteEntry,
        Operation::GetAllEntries,
        Operation::GetEntry,
        Operation::GetLastNDays,
        Operation::CalculateStreak,
        Operation::GetEntriesWithFallback,
    ];

    /// Writes and auth must surface failures; reads favour availability.
    pub const fn on_failure(self) -> OnFailure {
        match self {
            Operation::Register
            | Operation::Login
            | Operation::SaveEntry
            | Operation::DeleteEntry => OnFailure::Propagate,
            Operation::GetAllEntries
            | Operation::GetEntry
            | Operation::GetLastNDays
            | Operation::CalculateStreak => OnFailure::ReturnDefault,
            Operation::GetEntriesWithFallback => OnFailure::ReadLocalCache,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::SaveEntry => "save_entry",
            Operation::DeleteEntry => "delete_entry",
            Operation::GetAllEntries => "get_all_entries",
            Operation::GetEntry => "get_entry",
            Operation::GetLastNDays => "get_last_n_days",
            Operation::CalculateStreak => "calculate_streak",
            Operation::GetEntriesWithFallback => "get_entries_with_fallback",
        }
    }
}
