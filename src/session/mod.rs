pub(crate) mod effect_session;
