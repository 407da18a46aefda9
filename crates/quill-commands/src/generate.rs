//! Content generation commands.
//!
//! Every text command is a row in [`GENERATION_COMMANDS`]; they differ only in
//! prompt key, input bound and sampling defaults. Input is validated before
//! anything is deferred, so a rejected request never reaches a provider.

use crate::dispatch::{DispatchOutcome, DispatchRequest, OutcomeFormatter};
use crate::framework::{Context, Data, Error};
use crate::reply::{PoiseChannel, Reply, ReplyChannel};
use quill_common::{escape_markdown, validate_length};
use quill_providers::{
    CompletionRequest, ImageModel, ImageOptions, ImageQuality, ImageRequest, ImageSize,
    ImageStyle, TextModel,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// One text generation command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationCommand {
    /// Slash command name.
    pub name: &'static str,
    /// Reply heading.
    pub title: &'static str,
    /// Key of the system prompt in the prompt file.
    pub prompt_key: &'static str,
    /// Label of the user's input, used in rejections and the echo field.
    pub input_label: &'static str,
    /// Maximum input length in characters.
    pub max_input: usize,
    /// Model used when the caller does not pick one.
    pub default_model: TextModel,
    /// Sampling temperature unless the prompt file overrides it.
    pub temperature: f32,
}

/// `/grammar`
pub const GRAMMAR: GenerationCommand = GenerationCommand {
    name: "grammar",
    title: "Grammar check",
    prompt_key: "grammar",
    input_label: "text",
    max_input: 1500,
    default_model: TextModel::Gpt4oMini,
    temperature: 0.2,
};

/// `/webpage`
pub const WEBPAGE: GenerationCommand = GenerationCommand {
    name: "webpage",
    title: "Webpage",
    prompt_key: "webpage",
    input_label: "description",
    max_input: 1000,
    default_model: TextModel::Gpt4o,
    temperature: 0.7,
};

/// `/emoji`
pub const EMOJI: GenerationCommand = GenerationCommand {
    name: "emoji",
    title: "Emoji translation",
    prompt_key: "emoji",
    input_label: "text",
    max_input: 500,
    default_model: TextModel::Gpt4oMini,
    temperature: 0.9,
};

/// `/blockletters`
pub const BLOCKLETTERS: GenerationCommand = GenerationCommand {
    name: "blockletters",
    title: "Block letters",
    prompt_key: "blockletters",
    input_label: "text",
    max_input: 100,
    default_model: TextModel::Gpt4oMini,
    temperature: 0.0,
};

/// `/debug`
pub const DEBUG: GenerationCommand = GenerationCommand {
    name: "debug",
    title: "Debugging help",
    prompt_key: "debug",
    input_label: "code",
    max_input: 3000,
    default_model: TextModel::Gpt4o,
    temperature: 0.2,
};

/// `/story`
pub const STORY: GenerationCommand = GenerationCommand {
    name: "story",
    title: "Story",
    prompt_key: "story",
    input_label: "premise",
    max_input: 1000,
    default_model: TextModel::Gpt4o,
    temperature: 1.0,
};

/// `/ask_gpt`
pub const ASK_GPT: GenerationCommand = GenerationCommand {
    name: "ask_gpt",
    title: "Answer",
    prompt_key: "ask_gpt",
    input_label: "question",
    max_input: 230,
    default_model: TextModel::Gpt4oMini,
    temperature: 0.7,
};

/// Every text generation command.
pub const GENERATION_COMMANDS: &[GenerationCommand] =
    &[GRAMMAR, WEBPAGE, EMOJI, BLOCKLETTERS, DEBUG, STORY, ASK_GPT];

/// Longest image prompt accepted for each model.
pub const fn max_image_prompt(model: ImageModel) -> usize {
    match model {
        ImageModel::DallE2 => 1000,
        ImageModel::DallE3 => 4000,
    }
}

/// What became of a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Refused before dispatch; the notice was sent privately.
    Rejected(String),
    /// Handed to a dispatcher.
    Dispatched(DispatchOutcome),
}

fn capitalise(label: &str) -> String {
    let mut chars = label.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

async fn reject<C: ReplyChannel + ?Sized>(channel: &C, message: String) -> CommandOutcome {
    if let Err(e) = channel.send(Reply::private(message.clone())).await {
        warn!("Failed to send rejection: {}", e);
    }
    CommandOutcome::Rejected(message)
}

/// Validates `input`, resolves the system prompt and dispatches a completion.
pub async fn run_text_command<C: ReplyChannel + ?Sized>(
    channel: &C,
    data: &Data,
    command: &GenerationCommand,
    input: String,
    model: Option<TextModel>,
) -> CommandOutcome {
    if let Err(err) = validate_length(command.input_label, &input, command.max_input) {
        info!(command = command.name, "Rejected input: {}", err);
        return reject(channel, err.to_string()).await;
    }

    let Some(template) = data.config.prompts.get(command.prompt_key) else {
        error!(command = command.name, key = command.prompt_key, "No system prompt configured");
        return reject(
            channel,
            format!("`/{}` is not configured on this bot.", command.name),
        )
        .await;
    };

    let model = model.unwrap_or(command.default_model);
    let request = CompletionRequest::new(
        model,
        input.clone(),
        template.system_prompt(),
        template.temperature().unwrap_or(command.temperature),
    );
    info!(command = command.name, %model, "Dispatching completion");

    let provider = Arc::clone(&data.provider);
    let dispatch = DispatchRequest::new(command.title)
        .echo(&capitalise(command.input_label), &escape_markdown(&input));
    let outcome = data
        .api
        .dispatch(channel, dispatch, async move { provider.complete(request).await })
        .await;
    CommandOutcome::Dispatched(outcome)
}

/// Validates the prompt and options, then dispatches an image generation.
pub async fn run_image_command<C: ReplyChannel + ?Sized>(
    channel: &C,
    data: &Data,
    prompt: String,
    options: ImageOptions,
) -> CommandOutcome {
    if let Err(err) = validate_length("prompt", &prompt, max_image_prompt(options.model)) {
        info!(command = "image", "Rejected input: {}", err);
        return reject(channel, err.to_string()).await;
    }
    if let Err(err) = options.validate() {
        info!(command = "image", "Rejected options: {}", err);
        let formatter = data.images.formatter();
        let message = formatter.failure_message(formatter.classify(&err), Some(&err));
        return reject(channel, message).await;
    }

    info!(command = "image", model = %options.model, size = %options.size, "Dispatching image");
    let provider = Arc::clone(&data.provider);
    let request = ImageRequest::new(prompt.clone(), options);
    let dispatch = DispatchRequest::new("Image").echo("Prompt", &escape_markdown(&prompt));
    let outcome = data
        .images
        .dispatch(channel, dispatch, async move {
            provider.generate_image(request).await
        })
        .await;
    CommandOutcome::Dispatched(outcome)
}

async fn generate(
    ctx: Context<'_>,
    command: &GenerationCommand,
    input: String,
    model: Option<TextModel>,
) -> Result<(), Error> {
    let channel = PoiseChannel::new(ctx);
    run_text_command(&channel, ctx.data(), command, input, model).await;
    Ok(())
}

/// Corrects spelling and grammar.
#[poise::command(slash_command, category = "Generate")]
pub async fn grammar(
    ctx: Context<'_>,
    #[description = "Text to correct"] text: String,
) -> Result<(), Error> {
    generate(ctx, &GRAMMAR, text, None).await
}

/// Writes a single-file web page from a description.
#[poise::command(slash_command, category = "Generate")]
pub async fn webpage(
    ctx: Context<'_>,
    #[description = "What the page should contain"] description: String,
) -> Result<(), Error> {
    generate(ctx, &WEBPAGE, description, None).await
}

/// Retells text in emoji.
#[poise::command(slash_command, category = "Generate")]
pub async fn emoji(
    ctx: Context<'_>,
    #[description = "Text to translate into emoji"] text: String,
) -> Result<(), Error> {
    generate(ctx, &EMOJI, text, None).await
}

/// Spells text in regional indicator block letters.
#[poise::command(slash_command, category = "Generate")]
pub async fn blockletters(
    ctx: Context<'_>,
    #[description = "Text to spell out"] text: String,
) -> Result<(), Error> {
    generate(ctx, &BLOCKLETTERS, text, None).await
}

/// Finds and explains bugs in a code snippet.
#[poise::command(slash_command, category = "Generate")]
pub async fn debug(
    ctx: Context<'_>,
    #[description = "Code to debug"] code: String,
) -> Result<(), Error> {
    generate(ctx, &DEBUG, code, None).await
}

/// Writes a short story from a premise.
#[poise::command(slash_command, category = "Generate")]
pub async fn story(
    ctx: Context<'_>,
    #[description = "Premise of the story"] premise: String,
) -> Result<(), Error> {
    generate(ctx, &STORY, premise, None).await
}

/// Models offered by `/ask_gpt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum AskModel {
    /// GPT-4o
    #[name = "gpt-4o"]
    Gpt4o,
    /// GPT-4o mini
    #[name = "gpt-4o-mini"]
    Gpt4oMini,
    /// GPT-4 Turbo
    #[name = "gpt-4-turbo"]
    Gpt4Turbo,
    /// GPT-3.5 Turbo
    #[name = "gpt-3.5-turbo"]
    Gpt35Turbo,
    /// DeepSeek via OpenRouter
    #[name = "deepseek"]
    DeepSeek,
}

impl From<AskModel> for TextModel {
    fn from(model: AskModel) -> Self {
        match model {
            AskModel::Gpt4o => Self::Gpt4o,
            AskModel::Gpt4oMini => Self::Gpt4oMini,
            AskModel::Gpt4Turbo => Self::Gpt4Turbo,
            AskModel::Gpt35Turbo => Self::Gpt35Turbo,
            AskModel::DeepSeek => Self::DeepSeek,
        }
    }
}

/// Asks a model a short question.
#[poise::command(slash_command, category = "Generate")]
pub async fn ask_gpt(
    ctx: Context<'_>,
    #[description = "Your question (up to 230 characters)"] question: String,
    #[description = "Model to ask"] model: Option<AskModel>,
) -> Result<(), Error> {
    generate(ctx, &ASK_GPT, question, model.map(Into::into)).await
}

/// Image models offered by `/image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ImageModelChoice {
    /// DALL·E 3
    #[name = "DALL·E 3"]
    DallE3,
    /// DALL·E 2
    #[name = "DALL·E 2"]
    DallE2,
}

/// Image sizes offered by `/image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ImageSizeChoice {
    /// 1024x1024
    #[name = "1024x1024"]
    Square1024,
    /// 1792x1024
    #[name = "1792x1024 (landscape, DALL·E 3)"]
    Wide,
    /// 1024x1792
    #[name = "1024x1792 (portrait, DALL·E 3)"]
    Tall,
    /// 512x512
    #[name = "512x512 (DALL·E 2)"]
    Square512,
    /// 256x256
    #[name = "256x256 (DALL·E 2)"]
    Square256,
}

/// Rendering quality offered by `/image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ImageQualityChoice {
    /// standard
    #[name = "standard"]
    Standard,
    /// hd
    #[name = "hd"]
    Hd,
}

/// Rendering style offered by `/image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ImageStyleChoice {
    /// vivid
    #[name = "vivid"]
    Vivid,
    /// natural
    #[name = "natural"]
    Natural,
}

/// Builds provider options from the slash command choices.
pub fn image_options(
    model: Option<ImageModelChoice>,
    size: Option<ImageSizeChoice>,
    quality: Option<ImageQualityChoice>,
    style: Option<ImageStyleChoice>,
) -> ImageOptions {
    ImageOptions {
        model: match model {
            Some(ImageModelChoice::DallE2) => ImageModel::DallE2,
            Some(ImageModelChoice::DallE3) | None => ImageModel::DallE3,
        },
        size: match size {
            Some(ImageSizeChoice::Square256) => ImageSize::Square256,
            Some(ImageSizeChoice::Square512) => ImageSize::Square512,
            Some(ImageSizeChoice::Wide) => ImageSize::Wide,
            Some(ImageSizeChoice::Tall) => ImageSize::Tall,
            Some(ImageSizeChoice::Square1024) | None => ImageSize::Square1024,
        },
        quality: match quality {
            Some(ImageQualityChoice::Hd) => ImageQuality::Hd,
            Some(ImageQualityChoice::Standard) | None => ImageQuality::Standard,
        },
        style: match style {
            Some(ImageStyleChoice::Natural) => ImageStyle::Natural,
            Some(ImageStyleChoice::Vivid) | None => ImageStyle::Vivid,
        },
    }
}

/// Generates an image with DALL·E.
#[poise::command(slash_command, category = "Generate")]
pub async fn image(
    ctx: Context<'_>,
    #[description = "What to draw"] prompt: String,
    #[description = "Model (default DALL·E 3)"] model: Option<ImageModelChoice>,
    #[description = "Image size (default 1024x1024)"] size: Option<ImageSizeChoice>,
    #[description = "Quality, DALL·E 3 only (default standard)"] quality: Option<ImageQualityChoice>,
    #[description = "Style, DALL·E 3 only (default vivid)"] style: Option<ImageStyleChoice>,
) -> Result<(), Error> {
    let channel = PoiseChannel::new(ctx);
    let options = image_options(model, size, quality, style);
    run_image_command(&channel, ctx.data(), prompt, options).await;
    Ok(())
}
