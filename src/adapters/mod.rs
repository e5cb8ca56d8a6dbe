//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                   | Connects to              |
//! |------------|------------------------------|--------------------------|
//! | `gpio`     | `OutputPin`, `InputPin`      | ESP32 GPIO               |
//! | `hardware` | SensorPort, ActuatorPort,    | HC-SR04, LEDC light/tone |
//! |            | HardwarePort                 | stop button ISR          |
//! | `log_sink` | EventSink                    | Serial log output        |
//! | `time`     | Clock                        | ESP32 system timer       |

pub mod gpio;
pub mod hardware;
pub mod log_sink;
pub mod time;
