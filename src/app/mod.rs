mod app_helper;
pub(crate) use app_helper::AppHelper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

mod command;
pub(crate) use command::Command;

pub(crate) mod common;

mod encode_to_sat_command;
pub(crate) use encode_to_sat_command::EncodeToSatCommand;

mod learn_command;
pub(crate) use learn_command::LearnCommand;
