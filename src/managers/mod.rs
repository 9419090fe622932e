// LuxeMarks state managers
// Managers handle stateful collections; persistence lives in `database`.

pub mod bookmark_manager;
