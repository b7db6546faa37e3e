// Application layer: what each CLI subcommand does, independent of printing.

pub mod commands;
