pub(crate) mod timefmt;
