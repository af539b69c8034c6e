pub const BANNER: &str = r#" ____                   _     __
/ ___| _ __   __ _ _ __| | __/ _|_   _ ___  ___
\___ \| '_ \ / _` | '__| |/ / |_| | | / __|/ _ \
 ___) | |_) | (_| | |  |   <|  _| |_| \__ \  __/
|____/| .__/ \__,_|_|  |_|\_\_|  \__,_|___/\___|
      |_|"#;

pub const GREETING_WITH_REGISTRATION: &str =
    "Type 'login' to login or 'register' to create a new account.";

pub const GREETING_WITHOUT_REGISTRATION: &str =
    "Type 'login' to login. Registrations are currently closed.";

pub const LOBBY_WELCOME: &str = "Welcome to the Lobby";

pub const MOTD_MISSING: &str = "MOTD file not found.";
