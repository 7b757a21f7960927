//! Static model catalog.
//!
//! The catalog is fixed at build time; `/api/models` serves it verbatim.

use serde::Serialize;

/// One selectable completion model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
}

const fn model(id: &'static str, name: &'static str, provider: &'static str) -> ModelInfo {
    ModelInfo { id, name, provider }
}

/// Models offered by the upstream completion service.
pub const MODEL_CATALOG: &[ModelInfo] = &[
    model("minimax/MiniMax-M2.1", "MiniMax-M2.1", "Minimax"),
    model("z.ai/GLM-4.7", "GLM-4.7", "Z.ai"),
    model("deepseek-ai/DeepSeek-V3.2", "DeepSeek-V3.2", "DeepSeek"),
    model("openai/gpt-oss-120b", "gpt-oss-120b", "OpenAI"),
    model("moonshot-ai/Kimi-K2-Instruct", "Kimi-K2-Instruct", "Moonshot AI"),
    model("moonshot-ai/Kimi-K2-Thinking", "Kimi-K2-Thinking", "Moonshot AI"),
    model(
        "qwen/Qwen3-Coder-480B-A35B-Instruct",
        "Qwen3-Coder-480B-A35B-Instruct",
        "Qwen",
    ),
    model("nous-research/Hermes-4-405B", "Hermes-4-405B", "NousResearch"),
    model("nous-research/Hermes-4-70B", "Hermes-4-70B", "NousResearch"),
    model("openai/gpt-oss-20b", "gpt-oss-20b", "OpenAI"),
    model("z.ai/GLM-4.5", "GLM-4.5", "Z.ai"),
    model("z.ai/GLM-4.5-Air", "GLM-4.5-Air", "Z.ai"),
    model("prime-intellect/INTELLECT-3", "INTELLECT-3", "Prime Intellect"),
    model(
        "qwen/Qwen3-Next-80B-A3B-Thinking",
        "Qwen3-Next-80B-A3B-Thinking",
        "Qwen",
    ),
    model("deepseek-ai/DeepSeek-R1-0528", "DeepSeek-R1-0528", "DeepSeek"),
    model(
        "deepseek-ai/DeepSeek-R1-0528-fast",
        "DeepSeek-R1-0528 (Fast)",
        "DeepSeek",
    ),
    model(
        "qwen/Qwen3-235B-A22B-Thinking-2507",
        "Qwen3-235B-A22B-Thinking-2507",
        "Qwen",
    ),
    model(
        "qwen/Qwen3-235B-A22B-Instruct-2507",
        "Qwen3-235B-A22B-Instruct-2507",
        "Qwen",
    ),
    model(
        "qwen/Qwen3-30B-A3B-Thinking-2507",
        "Qwen3-30B-A3B-Thinking-2507",
        "Qwen",
    ),
    model(
        "qwen/Qwen3-30B-A3B-Instruct-2507",
        "Qwen3-30B-A3B-Instruct-2507",
        "Qwen",
    ),
    model(
        "qwen/Qwen3-Coder-30B-A3B-Instruct",
        "Qwen3-Coder-30B-A3B-Instruct",
        "Qwen",
    ),
    model("qwen/Qwen3-32B", "Qwen3-32B", "Qwen"),
    model("qwen/Qwen3-32B-fast", "Qwen3-32B (Fast)", "Qwen"),
    model(
        "nvidia/Llama-3.1-Nemotron-Ultra-253B-v1",
        "Llama-3.1-Nemotron-Ultra-253B-v1",
        "NVIDIA",
    ),
];
