//! Logging macros over the global router.
//!
//! Every leveled macro accepts an optional `domain: "name";` prefix; without
//! it the call goes to the default domain. Format arguments are expanded
//! once, before any handler runs.

/// Legacy log call at an explicit level.
#[macro_export]
macro_rules! log {
    ($domain:expr, $level:expr, $($arg:tt)+) => {
        $crate::log($domain, $level, ::std::format!($($arg)+))
    };
}

/// Error-level call. Never returns: Error is always fatal.
#[macro_export]
macro_rules! error {
    (domain: $domain:expr; $($arg:tt)+) => {{
        $crate::log($domain, $crate::LogLevel::Error, ::std::format!($($arg)+));
        ::std::unreachable!()
    }};
    ($($arg:tt)+) => {
        $crate::error!(domain: $crate::DEFAULT_DOMAIN; $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    (domain: $domain:expr; $($arg:tt)+) => {
        $crate::log($domain, $crate::LogLevel::Critical, ::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::critical!(domain: $crate::DEFAULT_DOMAIN; $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    (domain: $domain:expr; $($arg:tt)+) => {
        $crate::log($domain, $crate::LogLevel::Warning, ::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::warning!(domain: $crate::DEFAULT_DOMAIN; $($arg)+)
    };
}

#[macro_export]
macro_rules! message {
    (domain: $domain:expr; $($arg:tt)+) => {
        $crate::log($domain, $crate::LogLevel::Message, ::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::message!(domain: $crate::DEFAULT_DOMAIN; $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    (domain: $domain:expr; $($arg:tt)+) => {
        $crate::log($domain, $crate::LogLevel::Info, ::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::info!(domain: $crate::DEFAULT_DOMAIN; $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    (domain: $domain:expr; $($arg:tt)+) => {
        $crate::log($domain, $crate::LogLevel::Debug, ::std::format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::debug!(domain: $crate::DEFAULT_DOMAIN; $($arg)+)
    };
}

/// Structured call: key/value pairs, then `;` and the message template.
///
/// ```no_run
/// rask_log_router::log_structured!("some-domain", rask_log_router::LogLevel::Message,
///     "MESSAGE_ID" => "06d4df59e6c24647bfe69d2c27ef0b4e",
///     "MY_APPLICATION_CUSTOM_FIELD" => "some debug string";
///     "This is a debug message about integer {}.", 123);
/// ```
#[macro_export]
macro_rules! log_structured {
    ($domain:expr, $level:expr $(, $key:expr => $value:expr)* ; $($arg:tt)+) => {
        $crate::log_structured(
            $crate::FieldSetBuilder::new($domain, $level)
                $(.field($key, $value))*
                .message(::std::format_args!($($arg)+))
        )
    };
}

/// Plain output through the print sink.
#[macro_export]
macro_rules! log_print {
    ($($arg:tt)*) => {
        $crate::print(&::std::format!($($arg)*))
    };
}

/// Plain output through the printerr sink.
#[macro_export]
macro_rules! log_printerr {
    ($($arg:tt)*) => {
        $crate::printerr(&::std::format!($($arg)*))
    };
}

/// Returns from the current function with a Critical message when the
/// condition does not hold.
#[macro_export]
macro_rules! return_if_fail {
    ($cond:expr) => {
        if !$cond {
            $crate::return_if_fail_warning(::std::module_path!(), ::std::stringify!($cond));
            return;
        }
    };
}

/// Like [`return_if_fail!`], returning `$val`.
#[macro_export]
macro_rules! return_val_if_fail {
    ($cond:expr, $val:expr) => {
        if !$cond {
            $crate::return_if_fail_warning(::std::module_path!(), ::std::stringify!($cond));
            return $val;
        }
    };
}

/// Logs a Warning when the condition does not hold, and carries on.
#[macro_export]
macro_rules! warn_if_fail {
    ($cond:expr) => {
        if !$cond {
            $crate::warn_message(
                ::std::file!(),
                ::std::line!(),
                ::std::module_path!(),
                ::std::option::Option::Some(::std::stringify!($cond)),
            );
        }
    };
}

/// Logs a Warning that this point should not have been reached.
#[macro_export]
macro_rules! warn_if_reached {
    () => {
        $crate::warn_message(
            ::std::file!(),
            ::std::line!(),
            ::std::module_path!(),
            ::std::option::Option::None,
        )
    };
}
