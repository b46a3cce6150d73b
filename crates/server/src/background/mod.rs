mod ping;

pub(crate) use ping::spawn_ping_worker;
