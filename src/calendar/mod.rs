mod grid;
mod picker;
mod widget;
pub(crate) use self::grid::{is_weekday, weekends_between, OutOfTimeError};
pub(crate) use self::picker::{Picker, PickerInput, PickerOutput};
pub(crate) use self::widget::{popup_area, PickerWidget};
